mod message;
mod message_type;
