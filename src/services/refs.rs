//! 容器引用解析 - 业务能力层
//!
//! location 字符串形如 "ref/well"：斜杠前是容器引用名，
//! 斜杠后是孔位。分组引擎只依赖引用名这一部分

use std::collections::BTreeSet;

use regex::Regex;

use crate::models::Location;

/// 从 location 字符串中提取容器引用名
///
/// 没有斜杠时整个字符串就是引用名
pub fn ref_name(location: &str) -> &str {
    location.splitn(2, '/').next().unwrap_or(location)
}

/// 构建一组位置的容器引用集合
///
/// 排序去重后的集合，相等比较与位置顺序无关；
/// 缺失 location 字段的条目不参与
pub fn ref_set(locations: &[Location]) -> BTreeSet<String> {
    locations
        .iter()
        .filter_map(|l| l.location.as_deref())
        .map(|loc| ref_name(loc).to_string())
        .collect()
}

/// 从 location 字符串中提取孔位标签（如 "A1"、"3"）
///
/// 仅用于摘要日志，提取失败返回 None
pub fn well_label(location: &str) -> Option<String> {
    if let Ok(re) = Regex::new(r"^[^/]+/([A-Za-z]*\d+)$") {
        re.captures(location)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location {
            location: Some(s.to_string()),
        }
    }

    #[test]
    fn ref_name_takes_part_before_slash() {
        assert_eq!(ref_name("plate_1/A1"), "plate_1");
        assert_eq!(ref_name("tube/0"), "tube");
    }

    #[test]
    fn ref_name_without_slash_is_whole_string() {
        assert_eq!(ref_name("reservoir"), "reservoir");
    }

    #[test]
    fn ref_set_dedupes_and_ignores_order() {
        let a = ref_set(&[loc("p1/A1"), loc("p2/B2"), loc("p1/C3")]);
        let b = ref_set(&[loc("p2/D4"), loc("p1/E5")]);
        assert_eq!(a, b);
    }

    #[test]
    fn ref_set_skips_missing_locations() {
        let locations = vec![Location { location: None }, loc("p1/A1")];
        let set = ref_set(&locations);
        assert_eq!(set.len(), 1);
        assert!(set.contains("p1"));
    }

    #[test]
    fn well_label_extracts_well_part() {
        assert_eq!(well_label("plate_1/A1"), Some("A1".to_string()));
        assert_eq!(well_label("plate_1/12"), Some("12".to_string()));
        assert_eq!(well_label("plate_1"), None);
    }
}
