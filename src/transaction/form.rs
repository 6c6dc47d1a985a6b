//! The form shared by the pages for creating and editing transactions.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{Category, Division, TransactionDraft, TransactionKind},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// A short label for the transaction.
    pub title: String,
    /// The amount as typed by the user.
    pub amount: Decimal,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category, checked against `kind` by [TransactionDraft::validate].
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is personal or work-related.
    #[serde(default)]
    pub division: Division,
    /// Optional free text describing the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<TransactionForm> for TransactionDraft {
    fn from(form: TransactionForm) -> Self {
        Self {
            title: form.title.trim().to_owned(),
            amount: form.amount,
            kind: form.kind,
            category: form.category,
            date: form.date,
            division: form.division,
            note: form
                .note
                .map(|note| note.trim().to_owned())
                .filter(|note| !note.is_empty()),
        }
    }
}

/// The values to prefill the form with.
pub struct TransactionFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub kind: TransactionKind,
    pub category: Option<Category>,
    pub date: Date,
    pub division: Division,
    pub note: Option<&'a str>,
    pub max_date: Date,
}

impl<'a> TransactionFormDefaults<'a> {
    /// Defaults for a new expense dated `today`.
    pub fn new_transaction(today: Date) -> Self {
        Self {
            title: None,
            amount: None,
            kind: TransactionKind::Expense,
            category: None,
            date: today,
            division: Division::default(),
            note: None,
            max_date: today,
        }
    }

    /// Defaults that reproduce an existing transaction.
    pub fn from_draft(draft: &'a TransactionDraft, max_date: Date) -> Self {
        Self {
            title: Some(&draft.title),
            amount: Some(draft.amount),
            kind: draft.kind,
            category: Some(draft.category),
            date: draft.date,
            division: draft.division,
            note: draft.note.as_deref(),
            // A transaction dated in the future must stay editable.
            max_date: max_date.max(draft.date),
        }
    }
}

fn kind_radio(kind: TransactionKind, selected: TransactionKind) -> Markup {
    let id = format!("transaction-type-{}", kind.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[kind == selected]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label
                for=(id)
                class=(FORM_RADIO_LABEL_STYLE)
            {
                (kind.label())
            }
        }
    }
}

fn category_options(
    kind: TransactionKind,
    selected: Option<Category>,
    is_current_kind: bool,
) -> Markup {
    html! {
        optgroup label={ (kind.label()) " categories" }
        {
            @for category in Category::for_kind(kind) {
                option
                    value=(category.as_str())
                    selected[is_current_kind && selected == Some(*category)]
                {
                    (category.as_str())
                }
            }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));
    let (current_kind, other_kind) = match defaults.kind {
        TransactionKind::Expense => (TransactionKind::Expense, TransactionKind::Income),
        TransactionKind::Income => (TransactionKind::Income, TransactionKind::Expense),
    };

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                name="title"
                id="title"
                type="text"
                placeholder="e.g. Groceries"
                required
                autofocus
                value=[defaults.title]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (kind_radio(TransactionKind::Expense, defaults.kind))
                (kind_radio(TransactionKind::Income, defaults.kind))
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (category_options(current_kind, defaults.category, true))
                (category_options(other_kind, defaults.category, false))
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="division"
                class=(FORM_LABEL_STYLE)
            {
                "Division"
            }

            select
                name="division"
                id="division"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for division in Division::ALL {
                    option
                        value=(division.as_str())
                        selected[division == defaults.division]
                    {
                        (division.as_str())
                    }
                }
            }
        }

        div
        {
            label
                for="note"
                class=(FORM_LABEL_STYLE)
            {
                "Note"
            }

            input
                name="note"
                id="note"
                type="text"
                placeholder="Optional"
                value=[defaults.note]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{TransactionForm, TransactionFormDefaults, transaction_form_fields};
    use crate::{
        test_utils::sample_draft,
        transaction::{Category, Division, TransactionDraft, TransactionKind},
    };

    fn render(defaults: &TransactionFormDefaults<'_>) -> Html {
        let markup = maud::html! { form { (transaction_form_fields(defaults)) } };
        Html::parse_document(&markup.into_string())
    }

    fn selected_values(document: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("value"))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn new_transaction_defaults_to_expense() {
        let document = render(&TransactionFormDefaults::new_transaction(date!(2024 - 06 - 12)));

        assert_eq!(
            selected_values(&document, "input[type=radio][name=type][checked]"),
            ["expense"]
        );
        assert!(selected_values(&document, "#category option[selected]").is_empty());
        assert_eq!(
            selected_values(&document, "#division option[selected]"),
            ["Personal"]
        );
    }

    #[test]
    fn categories_of_current_kind_come_first() {
        let document = render(&TransactionFormDefaults::new_transaction(date!(2024 - 06 - 12)));

        let options = selected_values(&document, "#category option");
        let want: Vec<_> = Category::for_kind(TransactionKind::Expense)
            .iter()
            .chain(Category::for_kind(TransactionKind::Income))
            .map(|category| category.as_str().to_owned())
            .collect();
        assert_eq!(options, want);
    }

    #[test]
    fn prefills_existing_transaction() {
        let draft = TransactionDraft {
            kind: TransactionKind::Income,
            category: Category::Other,
            division: Division::Office,
            note: Some("Bonus".to_owned()),
            ..sample_draft()
        };

        let document = render(&TransactionFormDefaults::from_draft(
            &draft,
            date!(2024 - 06 - 12),
        ));

        assert_eq!(
            selected_values(&document, "input[type=radio][name=type][checked]"),
            ["income"]
        );
        // "Other" is listed for both kinds but only selected once.
        assert_eq!(
            selected_values(&document, "#category option[selected]"),
            ["Other"]
        );
        assert_eq!(
            selected_values(&document, "#division option[selected]"),
            ["Office"]
        );
        assert_eq!(selected_values(&document, "#amount"), ["45.20"]);
        assert_eq!(selected_values(&document, "#note"), ["Bonus"]);
    }

    #[test]
    fn parses_submitted_form() {
        let form: TransactionForm = serde_html_form::from_str(
            "title=+Lunch+&amount=12.50&type=expense&category=Food\
            &date=2024-06-10&division=Office&note=",
        )
        .unwrap();

        let draft = TransactionDraft::from(form);

        assert_eq!(draft.title, "Lunch");
        assert_eq!(draft.amount, dec!(12.50));
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.category, Category::Food);
        assert_eq!(draft.date, date!(2024 - 06 - 10));
        assert_eq!(draft.division, Division::Office);
        assert_eq!(draft.note, None);
    }
}
