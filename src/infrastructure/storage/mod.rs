mod local_transcript_cache;

pub use local_transcript_cache::LocalTranscriptCache;
