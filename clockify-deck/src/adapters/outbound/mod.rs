pub mod clockify;

pub use self::clockify::ClockifyApi;
