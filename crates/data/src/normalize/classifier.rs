//! Column role classification.
//!
//! Provider column names drift between releases ("招股开始日" vs "招股开始",
//! "股份代号" vs "股票代码"). Each logical role carries a ranked list of
//! candidate names; the first candidate that matches any column wins, exact
//! matches before substring matches.

use std::collections::HashMap;

/// Logical meaning of a provider column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Code,
    Name,
    Start,
    End,
    Window,
    Listing,
    Price,
    MarketCap,
    Sponsor,
    Industry,
    Cornerstone,
    Oversubscription,
}

impl ColumnRole {
    pub const ALL: [Self; 12] = [
        Self::Code,
        Self::Name,
        Self::Start,
        Self::End,
        Self::Window,
        Self::Listing,
        Self::Price,
        Self::MarketCap,
        Self::Sponsor,
        Self::Industry,
        Self::Cornerstone,
        Self::Oversubscription,
    ];

    /// Candidate column names, most preferred first.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Code => &["股票代码", "证券代码", "代码", "代号", "股份代号"],
            Self::Name => &["股票简称", "股票名称", "简称", "公司名称", "名称"],
            Self::Start => &[
                "招股开始",
                "招股开始日",
                "招股起始日",
                "开始日期",
                "申购开始",
                "开始申购",
            ],
            Self::End => &[
                "招股结束",
                "招股截止",
                "招股结束日",
                "结束日期",
                "申购截止",
                "截止日期",
            ],
            Self::Window => &["招股日期", "招股期", "申购日期", "招股时间"],
            Self::Listing => &["上市日期", "上市日", "挂牌日期", "挂牌日", "交易日期"],
            Self::Price => &[
                "招股价",
                "发行价",
                "发售价",
                "发售价区间",
                "招股价范围",
                "发行价(港元)",
            ],
            Self::MarketCap => &["市值", "发行市值", "总市值", "预期市值"],
            Self::Sponsor => &["保荐人", "保荐", "保荐人/稳价人", "保荐人及稳价人"],
            Self::Industry => &["行业", "所属行业", "板块", "行业类别"],
            Self::Cornerstone => &["基石", "基石投资者", "基石占比"],
            Self::Oversubscription => &["超购", "认购倍数", "融资倍数", "孖展倍数", "超额认购"],
        }
    }
}

/// Role → matched column name for one fetch. Unmatched roles are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoleMap {
    columns: HashMap<ColumnRole, String>,
}

impl ColumnRoleMap {
    /// Classifies the observed columns against every role's candidate list.
    ///
    /// One column may serve several roles; matches are not deduplicated.
    #[must_use]
    pub fn classify(columns: &[String]) -> Self {
        let columns = ColumnRole::ALL
            .iter()
            .filter_map(|&role| {
                find_column(columns, role.candidates()).map(|col| (role, col.to_string()))
            })
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Finds the first column matching the highest-ranked candidate that matches at all.
///
/// For each candidate: exact name match across all columns, then substring
/// match, both in column order.
#[must_use]
pub fn find_column<'a>(columns: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        columns
            .iter()
            .find(|col| col.as_str() == *candidate)
            .or_else(|| columns.iter().find(|col| col.contains(candidate)))
            .map(String::as_str)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_exact_match_beats_later_substring_candidate() {
        let columns = cols(&["股票代码", "公司名称", "招股开始日", "招股结束日"]);
        let map = ColumnRoleMap::classify(&columns);

        assert_eq!(map.get(ColumnRole::Code), Some("股票代码"));
        assert_eq!(map.get(ColumnRole::Name), Some("公司名称"));
        assert_eq!(map.get(ColumnRole::Start), Some("招股开始日"));
        assert_eq!(map.get(ColumnRole::End), Some("招股结束日"));
        assert_eq!(map.get(ColumnRole::Listing), None);
        assert_eq!(map.get(ColumnRole::Price), None);
    }

    #[test]
    fn test_candidate_priority_over_column_order() {
        // "代码" would substring-match the first column, but "证券代码" ranks higher.
        let columns = cols(&["代码备注", "证券代码"]);
        assert_eq!(find_column(&columns, ColumnRole::Code.candidates()), Some("证券代码"));
    }

    #[test]
    fn test_exact_before_substring_for_same_candidate() {
        let columns = cols(&["上市日期(预计)", "上市日期"]);
        assert_eq!(find_column(&columns, &["上市日期"]), Some("上市日期"));
    }

    #[test]
    fn test_substring_takes_first_in_column_order() {
        let columns = cols(&["首日市值", "发行市值"]);
        assert_eq!(find_column(&columns, &["市值"]), Some("首日市值"));
    }

    #[test]
    fn test_same_column_can_fill_multiple_roles() {
        let columns = cols(&["保荐人/基石"]);
        let map = ColumnRoleMap::classify(&columns);
        assert_eq!(map.get(ColumnRole::Sponsor), Some("保荐人/基石"));
        assert_eq!(map.get(ColumnRole::Cornerstone), Some("保荐人/基石"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_no_columns_maps_nothing() {
        let map = ColumnRoleMap::classify(&[]);
        assert!(map.is_empty());
    }
}
