mod common;
mod failures;
mod full;
mod resumed;
