use std::collections::VecDeque;
use std::sync::Arc;

pub const PREVIEW_CACHE_SIZE: usize = 32;

/// Most recently used PNG previews, keyed by a digest of everything that
/// went into the render.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: VecDeque<(String, Arc<Vec<u8>>)>,
}

impl PreviewCache {
    pub fn get(&mut self, key: &str) -> Option<Arc<Vec<u8>>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let png = entry.1.clone();
        self.entries.push_back(entry);
        Some(png)
    }

    pub fn insert(&mut self, key: String, png: Arc<Vec<u8>>) {
        self.entries.retain(|(k, _)| *k != key);
        if self.entries.len() >= PREVIEW_CACHE_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back((key, png));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_recently_used_entry_goes_first() {
        let mut cache = PreviewCache::default();
        for i in 0..PREVIEW_CACHE_SIZE {
            cache.insert(format!("k{i}"), Arc::new(vec![i as u8]));
        }
        assert!(cache.get("k0").is_some());
        cache.insert("new".into(), Arc::new(vec![]));

        assert_eq!(cache.len(), PREVIEW_CACHE_SIZE);
        assert!(cache.get("k0").is_some());
        assert!(cache.get("k1").is_none());
        assert!(cache.get("new").is_some());
    }
}
