//! Tests for batch progress tracking

#[cfg(test)]
mod tests {
    use std::path::Path;
    use treasuremap::io::progress::ProgressManager;

    // Tests ProgressManager construction
    // Verified by setting wrong initial state
    #[test]
    fn test_progress_manager_new() {
        let pm = ProgressManager::new();
        assert_eq!(pm.completed(), 0);

        pm.start_tile(0, Path::new("ignored.png"));
        pm.finish();
    }

    // Tests completion counting over a batch
    // Verified by counting only when a bar exists
    #[test]
    fn test_progress_counts_completed_tiles() {
        let mut pm = ProgressManager::default();
        pm.complete_tile("before");
        assert_eq!(pm.completed(), 1);

        pm.initialize(3);
        assert_eq!(pm.completed(), 0);
        for (index, name) in ["1.png", "2.png", "3.png"].iter().enumerate() {
            pm.start_tile(index, Path::new(name));
            pm.complete_tile("BLANK");
        }
        assert_eq!(pm.completed(), 3);
        pm.finish();
    }

    // Tests an empty batch
    // Verified by dividing by the tile count
    #[test]
    fn test_progress_empty_batch() {
        let mut pm = ProgressManager::new();
        pm.initialize(0);
        pm.finish();
        assert_eq!(pm.completed(), 0);
    }
}
