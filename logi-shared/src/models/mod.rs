pub mod events;

pub use events::LogisticsEvent;
