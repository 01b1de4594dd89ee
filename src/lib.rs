// Базовые модули
pub mod error;
pub mod config;
pub mod lock;
pub mod util;

// Хранилище батчей: snapstore/{mod,id,metadata,batch,mirror,restore,retention}.rs
pub mod snapstore;

// snapshot-then-write для предложенных правок
pub mod apply;

// Сбор исходников для внешнего inference-коллаборатора
pub mod collector; // src/collector/{mod,glob,ignore_file}.rs

// Удобные реэкспорты
pub use apply::{ApplyOutcome, ChangeApplier, Edit};
pub use collector::{collect_sources, CollectOptions};
pub use config::AyeConfig;
pub use error::{Error, Result};
pub use snapstore::{
    BatchId, BatchListing, BatchMetadata, FileRecord, RestoreReport, RetentionPolicy,
    SnapshotStore,
};
