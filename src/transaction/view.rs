//! Views for showing transactions and totals, used by the dashboard and the transactions page.

use maud::{Markup, html};

use crate::{
    category::CategoryType,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::{Summary, Transaction},
};

const SUMMARY_CARD_STYLE: &str = "flex-1 p-4 bg-white rounded shadow dark:bg-gray-800";

/// Cards showing total income, total expenses and the balance.
pub fn summary_view(summary: &Summary) -> Markup {
    let balance_style = if summary.balance < 0.0 {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    };

    html! {
        div id="summary" class="flex flex-col md:flex-row gap-4 w-full max-w-screen-lg my-4"
        {
            div class=(SUMMARY_CARD_STYLE)
            {
                h3 class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                p id="total-income" class="text-2xl font-bold" { (format_currency(summary.total_income)) }
            }

            div class=(SUMMARY_CARD_STYLE)
            {
                h3 class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                p id="total-expense" class="text-2xl font-bold" { (format_currency(summary.total_expense)) }
            }

            div class=(SUMMARY_CARD_STYLE)
            {
                h3 class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }
                p id="balance" class=(balance_style) { (format_currency(summary.balance)) }
            }
        }
    }
}

/// A table of transactions with links to edit or delete each one.
pub fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full max-w-screen-lg overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class="px-6 py-4 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    // Expenses are shown as negative amounts.
    let signed_amount = match transaction.category_type {
        CategoryType::Income => transaction.amount,
        CategoryType::Expense => -transaction.amount,
    };
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                (transaction.category_name)
                " "
                span class="text-xs text-gray-400" { "(" (transaction.category_type.as_str()) ")" }
            }
            td class="px-6 py-4 text-right" { (format_currency(signed_amount)) }
            td class="px-6 py-4 flex gap-4"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                form method="post" action=(delete_url)
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}
