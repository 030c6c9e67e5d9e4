//! Row synthesis: provider row + column roles → [`IpoRecord`].
//!
//! Every output field is filled. Missing or malformed cells fall back to
//! placeholder text rather than failing the row.

use crate::models::{Business, CoreData, IpoEvent, IpoRecord, Logic, Scores, Strategy};
use crate::normalize::classifier::{ColumnRole, ColumnRoleMap};
use crate::normalize::scalar::{format_date, to_date, to_display_string};
use crate::normalize::status::{compute_status, Milestones};
use crate::normalize::window::parse_window;
use chrono::NaiveDate;
use hk_ipo_core::{CellValue, RawRow, RawTable};

pub const UNNAMED: &str = "未命名";
pub const CODE_PENDING: &str = "待定";
pub const WINDOW_PENDING: &str = "待定";
pub const UNCLASSIFIED: &str = "未分类";
pub const PRICE_MARKET_CAP_PENDING: &str = "招股价/市值待披露";
pub const SPONSOR_PENDING: &str = "保荐人/稳价人待披露";
pub const CORNERSTONE_PENDING: &str = "基石占比待披露";
pub const OVERSUBSCRIPTION_PENDING: &str = "超购倍数待披露";
pub const BUSINESS_CORE_PENDING: &str = "核心业务待披露。";
pub const BUSINESS_POSITION_PENDING: &str = "行业地位待招股书披露。";
pub const BUSINESS_REVENUE_PENDING: &str = "财务披露待补充。";

// Neutral placeholders until a scoring model exists.
pub const NEUTRAL_SCORE: f64 = 5.0;
const LOGIC_UP: &str = "缺少基石/估值/保荐人历史等关键数据，暂以中性分预估。";
const LOGIC_HIT: &str = "缺少认购倍数与回拨数据，暂以中性分预估。";
const STRATEGY_ACTION: &str = "观望或小额申购";
const STRATEGY_RISK: &str = "信息不足，需等待招股书与市场热度数据补充。";

/// Normalizes every row of `table`, in order, relative to `today`.
#[must_use]
pub fn normalize_table(table: &RawTable, today: NaiveDate) -> Vec<IpoRecord> {
    let roles = ColumnRoleMap::classify(table.columns());
    tracing::debug!(
        columns = table.columns().len(),
        matched_roles = roles.len(),
        "classified provider columns"
    );

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| synthesize_row(table, row, index, &roles, today))
        .collect()
}

/// Reads the cell mapped to `role`, if the role matched a column.
fn cell<'a>(row: &'a RawRow, roles: &ColumnRoleMap, role: ColumnRole) -> Option<&'a CellValue> {
    roles.get(role).and_then(|column| row.get(column))
}

fn text(row: &RawRow, roles: &ColumnRoleMap, role: ColumnRole) -> String {
    to_display_string(cell(row, roles, role))
}

fn text_or(row: &RawRow, roles: &ColumnRoleMap, role: ColumnRole, placeholder: &str) -> String {
    let value = text(row, roles, role);
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Builds one record. `index` is the row's position in the table.
#[must_use]
pub fn synthesize_row(
    table: &RawTable,
    row: &RawRow,
    index: usize,
    roles: &ColumnRoleMap,
    today: NaiveDate,
) -> IpoRecord {
    let name = text(row, roles, ColumnRole::Name);
    let code = text(row, roles, ColumnRole::Code);
    let industry = text(row, roles, ColumnRole::Industry);

    let mut start = to_date(cell(row, roles, ColumnRole::Start));
    let mut end = to_date(cell(row, roles, ColumnRole::End));

    // Only fill the sides the discrete columns left empty.
    if (start.is_none() || end.is_none()) && roles.get(ColumnRole::Window).is_some() {
        let (window_start, window_end) = parse_window(cell(row, roles, ColumnRole::Window));
        start = start.or(window_start);
        end = end.or(window_end);
    }

    let listed = to_date(cell(row, roles, ColumnRole::Listing));

    let (event, event_date) = headline(start, end, listed);

    let status = compute_status(&Milestones {
        start,
        end,
        listed,
        today,
    });

    let price = text(row, roles, ColumnRole::Price);
    let market_cap = text(row, roles, ColumnRole::MarketCap);

    let window = [format_date(start), format_date(end)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" - ");

    let business_core = if industry.is_empty() {
        BUSINESS_CORE_PENDING.to_string()
    } else {
        format!("主要从事{industry}相关业务，详细业务以招股书披露为准。")
    };

    let id_prefix = [code.as_str(), name.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("ipo");

    IpoRecord {
        id: format!("{id_prefix}-{index}"),
        name: or_placeholder(&name, UNNAMED),
        code: or_placeholder(&code, CODE_PENDING),
        date: format_date(event_date),
        event: event.label().to_string(),
        window: or_placeholder(&window, WINDOW_PENDING),
        status: status.label().to_string(),
        status_type: status,
        sector: or_placeholder(&industry, UNCLASSIFIED),
        business: Business {
            core: business_core,
            position: BUSINESS_POSITION_PENDING.to_string(),
            revenue: BUSINESS_REVENUE_PENDING.to_string(),
        },
        core_data: CoreData {
            price_market_cap: combine_price_market_cap(&price, &market_cap),
            sponsor_stabilizer: text_or(row, roles, ColumnRole::Sponsor, SPONSOR_PENDING),
            cornerstone: text_or(row, roles, ColumnRole::Cornerstone, CORNERSTONE_PENDING),
            oversubscription: text_or(
                row,
                roles,
                ColumnRole::Oversubscription,
                OVERSUBSCRIPTION_PENDING,
            ),
        },
        scores: Scores {
            up: NEUTRAL_SCORE,
            hit: NEUTRAL_SCORE,
        },
        logic: Logic {
            up: LOGIC_UP.to_string(),
            hit: LOGIC_HIT.to_string(),
        },
        strategy: Strategy {
            action: STRATEGY_ACTION.to_string(),
            risk: STRATEGY_RISK.to_string(),
        },
        raw: table.row_to_json(row),
    }
}

/// Picks the headline milestone: start, then end, then listing.
fn headline(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    listed: Option<NaiveDate>,
) -> (IpoEvent, Option<NaiveDate>) {
    [
        (IpoEvent::SubscriptionStart, start),
        (IpoEvent::SubscriptionEnd, end),
        (IpoEvent::Listing, listed),
    ]
    .into_iter()
    .find(|(_, date)| date.is_some())
    .unwrap_or((IpoEvent::Undetermined, None))
}

/// `"<price> / <market cap>"`, whichever side exists, or the placeholder.
#[must_use]
pub fn combine_price_market_cap(price: &str, market_cap: &str) -> String {
    match (price.is_empty(), market_cap.is_empty()) {
        (false, false) => format!("{price} / {market_cap}"),
        (false, true) => price.to_string(),
        (true, false) => market_cap.to_string(),
        (true, true) => PRICE_MARKET_CAP_PENDING.to_string(),
    }
}
