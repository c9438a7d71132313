//! The transactions page: a filterable, sortable list of transactions with totals.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, CategoryType, get_all_categories},
    date_range::DateRange,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{
        SortBy, SortDirection, Summary, Transaction, TransactionFilter,
        form::parse_date,
        get_summary, get_transactions,
        view::{summary_view, transactions_table},
    },
};

/// The raw query parameters of the transactions page.
///
/// Values are kept as strings so that a malformed parameter only drops that
/// one filter instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
}

impl TransactionsQuery {
    /// Convert the query parameters into a [TransactionFilter].
    ///
    /// - A category ID that is not a positive integer is ignored.
    /// - A type other than "income" or "expense" is ignored.
    /// - A missing or empty date defaults to the first or last day of the
    ///   month containing `today`. A malformed date leaves that end of the
    ///   range open.
    pub fn into_filter(self, today: Date) -> TransactionFilter {
        let month = DateRange::month_of(today);

        TransactionFilter {
            category_id: non_empty(&self.category_id)
                .and_then(|id| id.parse().ok())
                .filter(|id| *id > 0),
            category_type: non_empty(&self.category_type)
                .and_then(|category_type| CategoryType::from_str(category_type).ok()),
            start_date: date_or_default(&self.start_date, month.start),
            end_date: date_or_default(&self.end_date, month.end),
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortBy::from_query)
                .unwrap_or_default(),
            sort_direction: self
                .sort_dir
                .as_deref()
                .map(SortDirection::from_query)
                .unwrap_or_default(),
            limit: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn date_or_default(value: &Option<String>, default: Date) -> Option<Date> {
    match non_empty(value) {
        None => Some(default),
        Some(text) => parse_date(text)
            .inspect_err(|error| tracing::debug!("ignoring date filter {text:?}: {error}"))
            .ok(),
    }
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the transactions matching the query parameters and their totals.
///
/// The totals cover every transaction in the filter's date range, regardless
/// of the category filters.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let filter = query.clone().into_filter(today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&filter, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let summary = get_summary(
        filter.start_date.unwrap_or(Date::MIN),
        filter.end_date.unwrap_or(Date::MAX),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get transaction summary: {error}"))?;
    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

    Ok(transactions_view(&query, &filter, &transactions, &summary, &categories).into_response())
}

fn transactions_view(
    query: &TransactionsQuery,
    filter: &TransactionFilter,
    transactions: &[Transaction],
    summary: &Summary,
    categories: &[Category],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex justify-between flex-wrap items-end w-full max-w-screen-lg"
            {
                h1 class="text-xl font-bold" { "Transactions" }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                {
                    "Create Transaction"
                }
            }

            (filter_form(filter, categories))
            (summary_view(summary))
            (sort_links(query, filter))
            (transactions_table(transactions))
        }
    };

    base("Transactions", &content)
}

fn filter_form(filter: &TransactionFilter, categories: &[Category]) -> Markup {
    let start_date = filter.start_date.map(|date| date.to_string());
    let end_date = filter.end_date.map(|date| date.to_string());

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 md:grid-cols-4 gap-4 w-full max-w-screen-lg my-4"
        {
            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[filter.category_id == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All types" }

                    @for category_type in [CategoryType::Income, CategoryType::Expense] {
                        option
                            value=(category_type.as_str())
                            selected[filter.category_type == Some(category_type)]
                        {
                            (category_type.label())
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            input type="hidden" name="sort_by" value=(filter.sort_by.as_query_value());
            input type="hidden" name="sort_dir" value=(filter.sort_direction.as_sql());

            div class="col-span-2 md:col-span-4 flex gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Reset" }
            }
        }
    }
}

/// Links for sorting by each column.
///
/// The link for the current column flips the direction, other columns start descending.
/// The other parameters of `query` are kept as they were submitted.
fn sort_links(query: &TransactionsQuery, filter: &TransactionFilter) -> Markup {
    let links: Vec<_> = [SortBy::Date, SortBy::Category, SortBy::Amount]
        .into_iter()
        .filter_map(|sort_by| {
            let is_current = filter.sort_by == sort_by;
            let direction = if is_current {
                filter.sort_direction.reversed()
            } else {
                SortDirection::Desc
            };

            sort_url(query, sort_by, direction).map(|url| (sort_by, is_current, url))
        })
        .collect();
    let arrow = match filter.sort_direction {
        SortDirection::Asc => " ↑",
        SortDirection::Desc => " ↓",
    };

    html! {
        nav id="sort" class="flex gap-4 w-full max-w-screen-lg mb-2 text-sm"
        {
            span { "Sort by:" }

            @for (sort_by, is_current, url) in links {
                a
                    href=(url)
                    class=(LINK_STYLE)
                    aria-current=[is_current.then_some("true")]
                {
                    (sort_by.label())

                    @if is_current {
                        (arrow)
                    }
                }
            }
        }
    }
}

/// The transactions page URL with the current filters and a new sort order.
fn sort_url(query: &TransactionsQuery, sort_by: SortBy, direction: SortDirection) -> Option<String> {
    let query = TransactionsQuery {
        sort_by: Some(sort_by.as_query_value().to_owned()),
        sort_dir: Some(direction.as_sql().to_owned()),
        ..query.clone()
    };

    serde_urlencoded::to_string(&query)
        .inspect_err(|error| tracing::error!("could not encode sort link: {error}"))
        .ok()
        .map(|query_string| format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW))
}

#[cfg(test)]
mod transactions_query_tests {
    use time::macros::date;

    use crate::{
        category::CategoryType,
        transaction::{SortBy, SortDirection, TransactionFilter},
    };

    use super::TransactionsQuery;

    const TODAY: time::Date = date!(2024 - 02 - 14);

    fn query(pairs: &[(&str, &str)]) -> TransactionsQuery {
        let query_string = serde_urlencoded::to_string(pairs).unwrap();
        serde_urlencoded::from_str(&query_string).unwrap()
    }

    #[test]
    fn empty_query_defaults_to_current_month() {
        let filter = TransactionsQuery::default().into_filter(TODAY);

        assert_eq!(
            filter,
            TransactionFilter {
                start_date: Some(date!(2024 - 02 - 01)),
                end_date: Some(date!(2024 - 02 - 29)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn parses_every_parameter() {
        let filter = query(&[
            ("category_id", "4"),
            ("type", "income"),
            ("start_date", "2023-12-01"),
            ("end_date", "2023-12-24"),
            ("sort_by", "amount"),
            ("sort_dir", "ASC"),
        ])
        .into_filter(TODAY);

        assert_eq!(
            filter,
            TransactionFilter {
                category_id: Some(4),
                category_type: Some(CategoryType::Income),
                start_date: Some(date!(2023 - 12 - 01)),
                end_date: Some(date!(2023 - 12 - 24)),
                sort_by: SortBy::Amount,
                sort_direction: SortDirection::Asc,
                limit: None,
            }
        );
    }

    #[test]
    fn invalid_category_filters_are_ignored() {
        for (category_id, category_type) in [("abc", "transfer"), ("0", "INCOME"), ("-3", "")] {
            let filter = query(&[("category_id", category_id), ("type", category_type)])
                .into_filter(TODAY);

            assert_eq!(filter.category_id, None, "category_id={category_id:?}");
            assert_eq!(filter.category_type, None, "type={category_type:?}");
        }
    }

    #[test]
    fn empty_dates_default_to_current_month() {
        let filter = query(&[("start_date", ""), ("end_date", "")]).into_filter(TODAY);

        assert_eq!(filter.start_date, Some(date!(2024 - 02 - 01)));
        assert_eq!(filter.end_date, Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn malformed_date_leaves_range_open() {
        let filter = query(&[("start_date", "last week")]).into_filter(TODAY);

        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, Some(date!(2024 - 02 - 29)));
    }
}

#[cfg(test)]
mod transactions_page_tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        test_utils::{assert_content_type, assert_valid_html, parse_html_document, test_connection},
        transaction::{NewTransaction, create_transaction},
    };

    use super::{TransactionsPageState, TransactionsQuery, get_transactions_page};

    fn get_state() -> TransactionsPageState {
        TransactionsPageState {
            db_connection: test_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn add_transaction(state: &TransactionsPageState, amount: f64, category_id: i64, day: u8) {
        create_transaction(
            NewTransaction {
                amount,
                description: format!("Day {day}"),
                category_id,
                transaction_date: date!(2024 - 01 - 01).replace_day(day).unwrap(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
    }

    fn transaction_ids(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tr[data-transaction-id]").unwrap())
            .map(|row| {
                row.value()
                    .attr("data-transaction-id")
                    .unwrap_or_default()
                    .to_owned()
            })
            .collect()
    }

    fn january() -> TransactionsQuery {
        TransactionsQuery {
            start_date: Some("2024-01-01".to_owned()),
            end_date: Some("2024-01-31".to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn lists_transactions_newest_first() {
        let state = get_state();
        add_transaction(&state, 10.0, 1, 5);
        add_transaction(&state, 20.0, 1, 20);
        add_transaction(&state, 30.0, 1, 12);

        let response = get_transactions_page(State(state), Query(january()))
            .await
            .expect("Could not render page");

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(transaction_ids(&html), ["2", "3", "1"]);
    }

    #[tokio::test]
    async fn sorts_by_amount_ascending() {
        let state = get_state();
        add_transaction(&state, 30.0, 1, 5);
        add_transaction(&state, 10.0, 1, 20);
        add_transaction(&state, 20.0, 1, 12);

        let query = TransactionsQuery {
            sort_by: Some("amount".to_owned()),
            sort_dir: Some("ASC".to_owned()),
            ..january()
        };
        let response = get_transactions_page(State(state), Query(query))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_eq!(transaction_ids(&html), ["2", "3", "1"]);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let state = get_state();
        add_transaction(&state, 10.0, 1, 5);
        add_transaction(&state, 20.0, 2, 6);

        let query = TransactionsQuery {
            category_id: Some("2".to_owned()),
            ..january()
        };
        let response = get_transactions_page(State(state), Query(query))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_eq!(transaction_ids(&html), ["2"]);
    }

    #[tokio::test]
    async fn filter_form_keeps_current_values() {
        let state = get_state();

        let query = TransactionsQuery {
            category_type: Some("expense".to_owned()),
            ..january()
        };
        let response = get_transactions_page(State(state), Query(query))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        let selected_type = html
            .select(&Selector::parse("select[name=type] option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected_type, Some("expense"));

        let start_date = html
            .select(&Selector::parse("input[name=start_date]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(start_date, Some("2024-01-01"));
    }

    #[tokio::test]
    async fn sort_link_reverses_current_direction() {
        let state = get_state();

        let query = TransactionsQuery {
            sort_by: Some("amount".to_owned()),
            sort_dir: Some("ASC".to_owned()),
            ..january()
        };
        let response = get_transactions_page(State(state), Query(query))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        let current_link = html
            .select(&Selector::parse("#sort a[aria-current]").unwrap())
            .next()
            .and_then(|link| link.value().attr("href"))
            .expect("No current sort link");
        assert_eq!(
            current_link,
            "/transactions?start_date=2024-01-01&end_date=2024-01-31&sort_by=amount&sort_dir=DESC"
        );
    }

    #[tokio::test]
    async fn sort_links_keep_submitted_dates() {
        let state = get_state();

        let query = TransactionsQuery {
            start_date: Some("last week".to_owned()),
            end_date: Some("2024-01-31".to_owned()),
            ..Default::default()
        };
        let response = get_transactions_page(State(state), Query(query))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        let current_link = html
            .select(&Selector::parse("#sort a[aria-current]").unwrap())
            .next()
            .and_then(|link| link.value().attr("href"))
            .expect("No current sort link");
        assert_eq!(
            current_link,
            "/transactions?start_date=last+week&end_date=2024-01-31&sort_by=date&sort_dir=ASC"
        );
    }
}
