//! 可用率统计
//!
//! 按域名累计探测总数和成功次数，进程内有效，不做持久化。

use std::collections::HashMap;

/// 单个域名的累计统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainStats {
    /// 探测总次数
    pub total: u64,
    /// UP 次数，恒有 `up <= total`
    pub up: u64,
}

impl DomainStats {
    /// 记录一次探测
    pub fn record(&mut self, is_up: bool) {
        self.total += 1;
        if is_up {
            self.up += 1;
        }
    }

    /// 可用率百分比
    ///
    /// 计算 `(up / total) * 100` 并按"四舍六入五成双"取整，`total == 0` 时为 0。
    pub fn percentage(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        ((self.up as f64 / self.total as f64) * 100.0).round_ties_even() as u64
    }
}

/// 可用率跟踪器
///
/// 条目在域名第一次被记录时创建，之后只增不删；遍历顺序即首次出现顺序。
/// 只供单个控制流使用，不做内部加锁。
#[derive(Debug, Default)]
pub struct AvailabilityTracker {
    /// 按首次出现顺序排列的统计
    entries: Vec<(String, DomainStats)>,
    /// 域名到 `entries` 下标的索引
    index: HashMap<String, usize>,
}

impl AvailabilityTracker {
    /// 创建空的跟踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 为域名记录一次探测结果
    pub fn record(&mut self, domain: &str, is_up: bool) {
        let position = match self.index.get(domain) {
            Some(&position) => position,
            None => {
                self.entries
                    .push((domain.to_string(), DomainStats::default()));
                let position = self.entries.len() - 1;
                self.index.insert(domain.to_string(), position);
                position
            }
        };

        self.entries[position].1.record(is_up);
    }

    /// 域名的可用率百分比，未记录过的域名为 0
    pub fn percentage(&self, domain: &str) -> u64 {
        self.stats(domain).map(DomainStats::percentage).unwrap_or(0)
    }

    /// 域名的累计统计
    pub fn stats(&self, domain: &str) -> Option<&DomainStats> {
        self.index.get(domain).map(|&position| &self.entries[position].1)
    }

    /// 按首次出现顺序遍历所有域名
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainStats)> {
        self.entries
            .iter()
            .map(|(domain, stats)| (domain.as_str(), stats))
    }

    /// 已跟踪的域名数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否尚未记录任何域名
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_domain_percentage_is_zero() {
        let tracker = AvailabilityTracker::new();
        assert_eq!(tracker.percentage("fetch.com"), 0);
        assert_eq!(DomainStats::default().percentage(), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_record_creates_entry_lazily() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("fetch.com", false);

        let stats = tracker.stats("fetch.com").unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.up, 0);
        assert_eq!(tracker.percentage("fetch.com"), 0);
    }

    #[test]
    fn test_rolling_percentage_across_cycles() {
        let mut tracker = AvailabilityTracker::new();
        for is_up in [true, true, false, true] {
            tracker.record("fetch.com", is_up);
        }

        let stats = tracker.stats("fetch.com").unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.up, 3);
        assert_eq!(tracker.percentage("fetch.com"), 75);
    }

    #[test]
    fn test_invariant_up_never_exceeds_total() {
        let mut tracker = AvailabilityTracker::new();
        for i in 0..50u32 {
            tracker.record("a.example", i % 3 != 0);
            let stats = tracker.stats("a.example").unwrap();
            assert!(stats.up <= stats.total);
            assert_eq!(stats.total, u64::from(i) + 1);
            assert_eq!(
                tracker.percentage("a.example"),
                ((stats.up as f64 / stats.total as f64) * 100.0).round_ties_even() as u64
            );
        }
    }

    #[test]
    fn test_percentage_rounding() {
        let stats = DomainStats { total: 3, up: 2 };
        assert_eq!(stats.percentage(), 67);

        let stats = DomainStats { total: 3, up: 1 };
        assert_eq!(stats.percentage(), 33);

        // 恰好 .5 时取偶数
        let stats = DomainStats { total: 8, up: 5 };
        assert_eq!(stats.percentage(), 62);
        let stats = DomainStats { total: 8, up: 1 };
        assert_eq!(stats.percentage(), 12);
    }

    #[test]
    fn test_iteration_follows_first_seen_order() {
        let mut tracker = AvailabilityTracker::new();
        tracker.record("fetch.com", true);
        tracker.record("www.fetchrewards.com", false);
        tracker.record("fetch.com", true);
        tracker.record("api.example.com", true);

        let domains: Vec<&str> = tracker.iter().map(|(domain, _)| domain).collect();
        assert_eq!(
            domains,
            vec!["fetch.com", "www.fetchrewards.com", "api.example.com"]
        );
        assert_eq!(tracker.len(), 3);
    }
}
