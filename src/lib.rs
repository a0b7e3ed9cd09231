pub mod batch;
pub mod cli;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod logger;
pub mod output_sink;
pub mod record;
pub mod wiki_url;

pub use batch::{BatchError, BatchRunner, BatchSummary, EntryOutcome};
pub use extractor::{extract, FieldExtractor, WikiExtractor};
pub use fetcher::{EntryFetcher, FetchError};
pub use record::{format_entry, format_error, ExtractedRecord, IndexNumber};
pub use wiki_url::{entry_url, EntryName};
