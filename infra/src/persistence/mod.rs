//! Snapshot persistence

mod snapshot_file;

#[cfg(test)]
mod tests;

pub use snapshot_file::FileSnapshotRepository;
