use std::collections::HashMap;

/// Occurrence counter that remembers first-seen order, so equal counts rank
/// in the order their keys first appeared.
#[derive(Debug, Default, Clone)]
pub struct FrequencyCounter {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>) {
        let key = key.into();
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.order.push(key.clone());
                self.counts.insert(key, 1);
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The `n` most frequent keys, highest count first.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .order
            .iter()
            .map(|key| (key.clone(), self.counts[key]))
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_ties() {
        let mut counter = FrequencyCounter::new();
        for key in ["b", "a", "c", "a", "c", "d"] {
            counter.add(key);
        }

        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(counter.len(), 4);
        assert_eq!(
            counter.most_common(3),
            vec![
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_most_common_on_empty() {
        let counter = FrequencyCounter::new();
        assert!(counter.is_empty());
        assert!(counter.most_common(5).is_empty());
    }
}
