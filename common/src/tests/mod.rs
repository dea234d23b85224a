mod clock;
mod error_location;
