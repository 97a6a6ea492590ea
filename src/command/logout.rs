use anyhow::Result;

use crate::auth::TokenCache;
use crate::config::Config;

pub fn run_logout(config: &Config) -> Result<()> {
    let cache = TokenCache::new(config.token_cache_path.clone());

    if !cache.path().exists() {
        println!("No cached token found.");
        return Ok(());
    }

    cache.invalidate();
    println!("✅ Removed cached token at {}", cache.path().display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::config;

    #[test]
    fn test_logout_removes_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), None);
        std::fs::write(&config.token_cache_path, "{}").unwrap();

        run_logout(&config).unwrap();
        assert!(!config.token_cache_path.exists());

        // second logout is a no-op
        run_logout(&config).unwrap();
    }
}
