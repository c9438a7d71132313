//! The dashboard: this month's totals and transactions, and the latest transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    date_range::DateRange,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{
        Summary, Transaction, TransactionFilter, get_summary, get_transactions, summary_view,
        transactions_table,
    },
};

/// How many of the latest transactions to show.
const RECENT_TRANSACTION_COUNT: u32 = 5;

const MONTH_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[month repr:long] [year]");

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for accessing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the current month.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let month = DateRange::month_of(today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_summary(month.start, month.end, &connection)
        .inspect_err(|error| tracing::error!("could not get monthly summary: {error}"))?;

    let month_transactions = get_transactions(
        &TransactionFilter {
            start_date: Some(month.start),
            end_date: Some(month.end),
            ..Default::default()
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get this month's transactions: {error}"))?;

    let recent_transactions = get_transactions(
        &TransactionFilter {
            limit: Some(RECENT_TRANSACTION_COUNT),
            ..Default::default()
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

    Ok(dashboard_view(today, &summary, &month_transactions, &recent_transactions).into_response())
}

fn dashboard_view(
    today: Date,
    summary: &Summary,
    month_transactions: &[Transaction],
    recent_transactions: &[Transaction],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let month_name = today
        .format(MONTH_FORMAT)
        .inspect_err(|error| tracing::error!("could not format month of {today}: {error}"))
        .unwrap_or_else(|_| "This month".to_owned());

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex justify-between flex-wrap items-end w-full max-w-screen-lg"
            {
                h1 id="month" class="text-xl font-bold" { (month_name) }

                p id="month-transaction-count" class="text-sm"
                {
                    (month_transactions.len())
                    @if month_transactions.len() == 1 { " transaction" } @else { " transactions" }
                    " this month"
                }
            }

            (summary_view(summary))

            section id="recent-transactions" class="w-full max-w-screen-lg my-4"
            {
                div class="flex justify-between items-end mb-2"
                {
                    h2 class="text-lg font-semibold" { "Recent Transactions" }
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
                }

                (transactions_table(recent_transactions))
            }

            section id="month-transactions" class="w-full max-w-screen-lg my-4"
            {
                h2 class="text-lg font-semibold mb-2" { "This Month" }

                (transactions_table(month_transactions))
            }
        }
    };

    base("Dashboard", &content)
}

#[cfg(test)]
mod dashboard_tests {
    use axum::{extract::State, http::StatusCode};
    use scraper::{Html, Selector};
    use time::Duration;

    use crate::{
        date_range::DateRange,
        test_utils::{assert_content_type, assert_valid_html, parse_html_document, test_connection},
        timezone::current_local_date,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_state() -> DashboardState {
        DashboardState {
            db_connection: test_connection(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn row_ids(html: &Html, section: &str) -> Vec<String> {
        html.select(&Selector::parse(&format!("#{section} tr[data-transaction-id]")).unwrap())
            .map(|row| {
                row.value()
                    .attr("data-transaction-id")
                    .unwrap_or_default()
                    .to_owned()
            })
            .collect()
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matches {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn empty_dashboard() {
        let response = get_dashboard_page(State(get_state()))
            .await
            .expect("Could not render dashboard");

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(text_of(&html, "#balance"), "$0.00");
        assert_eq!(
            text_of(&html, "#month-transaction-count"),
            "0 transactions this month"
        );
    }

    #[tokio::test]
    async fn shows_five_most_recent_transactions() {
        let state = get_state();
        let today = current_local_date(&state.local_timezone).unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            for days_ago in 0..7 {
                create_transaction(
                    NewTransaction {
                        amount: 1.0,
                        description: format!("{days_ago} days ago"),
                        category_id: 1,
                        transaction_date: today - Duration::days(days_ago * 40),
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not render dashboard");

        let html = parse_html_document(response).await;
        assert_eq!(row_ids(&html, "recent-transactions"), ["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn month_section_only_has_this_month() {
        let state = get_state();
        let today = current_local_date(&state.local_timezone).unwrap();
        let month = DateRange::month_of(today);
        {
            let connection = state.db_connection.lock().unwrap();
            for transaction_date in [month.start, month.start - Duration::days(1)] {
                create_transaction(
                    NewTransaction {
                        amount: 10.0,
                        description: String::new(),
                        category_id: 1,
                        transaction_date,
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(State(state))
            .await
            .expect("Could not render dashboard");

        let html = parse_html_document(response).await;
        assert_eq!(row_ids(&html, "month-transactions"), ["1"]);
        assert_eq!(
            text_of(&html, "#month-transaction-count"),
            "1 transaction this month"
        );
    }
}
