pub mod scrape;

// Re-export command functions for convenience
pub use scrape::{exit_code, scrape, ScrapeArgs, SummaryFormat};
