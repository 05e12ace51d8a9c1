mod account;
mod round;
