//! Builds the exported quote sheet: brand header, deal info, line items
//! and the financial summary, all in the user's locale.

use chrono::Utc;
use contracts::deal::{Deal, QuoteItem, QuoteSummary};

use super::{shipping_label, status_key};
use crate::shared::export::Sheet;
use crate::shared::format::{format_int, format_money};
use crate::shared::i18n::{tr, Locale};

pub fn quote_sheet(
    locale: Locale,
    deal: &Deal,
    items: &[QuoteItem],
    summary: &QuoteSummary,
) -> Sheet {
    let mut sheet = Sheet::new(&tr(locale, "price_quote"), locale == Locale::Ar);

    sheet.push_row([tr(locale, "platform_name")]);
    sheet.push_row([tr(locale, "platform_tagline")]);
    sheet.blank_row();
    sheet.push_row([tr(locale, "price_quote")]);
    sheet.blank_row();

    let deal_number = deal
        .deal_number
        .clone()
        .unwrap_or_else(|| deal.id.clone());
    sheet.push_row([tr(locale, "deal_number"), deal_number]);
    sheet.push_row([
        tr(locale, "date"),
        deal.created_at
            .clone()
            .map(|d| d.chars().take(10).collect())
            .unwrap_or_default(),
    ]);
    sheet.push_row([tr(locale, "client"), party(deal.client.as_ref())]);
    sheet.push_row([tr(locale, "trader"), party(deal.trader.as_ref())]);
    sheet.push_row([
        tr(locale, "shipping_type"),
        shipping_label(locale, deal.shipping_type.as_deref()),
    ]);
    sheet.push_row([tr(locale, "status"), tr(locale, status_key(deal.status))]);
    sheet.blank_row();

    sheet.push_row([
        tr(locale, "serial"),
        tr(locale, "item"),
        tr(locale, "item_number"),
        tr(locale, "negotiated_quantity"),
        tr(locale, "unit_price"),
        tr(locale, "negotiated_price"),
        tr(locale, "cbm"),
        tr(locale, "total"),
    ]);
    for (index, item) in items.iter().enumerate() {
        sheet.push_row([
            (index + 1).to_string(),
            item.title.clone(),
            item.item_number.clone(),
            format_int(item.negotiated_quantity),
            format_money(item.price_per_piece),
            format_money(item.negotiated_price),
            format_money(item.item_cbm()),
            format_money(item.total_price()),
        ]);
    }

    let total_quantity: i64 = items.iter().map(|i| i.negotiated_quantity).sum();
    let total_cbm: f64 = items.iter().map(QuoteItem::item_cbm).sum();
    let total_price: f64 = items.iter().map(QuoteItem::total_price).sum();
    sheet.push_row([
        String::new(),
        tr(locale, "total"),
        String::new(),
        format_int(total_quantity),
        String::new(),
        String::new(),
        format_money(total_cbm),
        format_money(total_price),
    ]);
    sheet.blank_row();

    sheet.push_row([tr(locale, "deal_amount"), format_money(summary.deal_amount)]);
    sheet.push_row([
        format!("{} ({}%)", tr(locale, "platform_commission"), summary.platform_rate),
        format_money(summary.platform_commission),
    ]);
    sheet.push_row([
        format!("{} ({}%)", tr(locale, "shipping_commission"), summary.shipping_rate),
        format_money(summary.shipping_commission),
    ]);
    sheet.push_row([tr(locale, "grand_total"), format_money(summary.grand_total)]);
    sheet.blank_row();

    sheet.push_row([format!(
        "{} | {}",
        tr(locale, "sheet_footer"),
        Utc::now().format("%Y-%m-%d %H:%M")
    )]);

    sheet
}

fn party(value: Option<&contracts::deal::Party>) -> String {
    value
        .and_then(|p| p.display_name())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::deal::{DealStatus, Party};
    use serde_json::json;

    fn fixture() -> (Deal, Vec<QuoteItem>, QuoteSummary) {
        let mut deal = Deal::default();
        deal.id = "deal-1".into();
        deal.deal_number = Some("D-042".into());
        deal.status = DealStatus::Negotiation;
        deal.created_at = Some("2026-08-20T10:30:00Z".into());
        deal.client = Some(Party {
            name: Some("Acme Trading".into()),
            company_name: None,
        });
        deal.negotiated_amount = json!(1000.0);

        let items = vec![QuoteItem {
            id: "di-1".into(),
            title: "Steel kettle".into(),
            item_number: "SK-100".into(),
            description: String::new(),
            image: String::new(),
            quantity: 500,
            pieces_per_carton: 24,
            price_per_piece: 5.0,
            cbm: 12.5,
            negotiated_price: 4.0,
            negotiated_quantity: 250,
            currency: "USD".into(),
        }];
        let summary = QuoteSummary::compute(&deal, &items, None);
        (deal, items, summary)
    }

    #[test]
    fn sheet_carries_deal_info_items_and_totals() {
        let (deal, items, summary) = fixture();
        let sheet = quote_sheet(Locale::En, &deal, &items, &summary);
        let rows = sheet.rows();

        assert_eq!(rows[0], vec!["Stockship".to_string()]);
        assert!(rows.iter().any(|r| r == &vec!["Deal number".to_string(), "D-042".to_string()]));
        assert!(rows.iter().any(|r| r == &vec!["Date".to_string(), "2026-08-20".to_string()]));

        // Item row: quantity, prices, proportional CBM, line total
        let item_row = rows.iter().find(|r| r.get(1).map(String::as_str) == Some("Steel kettle")).unwrap();
        assert_eq!(item_row[3], "250");
        assert_eq!(item_row[5], "4.00");
        assert_eq!(item_row[6], "6.25"); // (250/500) * 12.5
        assert_eq!(item_row[7], "1,000.00");

        // Financial summary uses the persisted deal amount
        assert!(rows.iter().any(|r| r == &vec!["Deal amount".to_string(), "1,000.00".to_string()]));
        assert!(rows
            .iter()
            .any(|r| r == &vec!["Platform commission (2.5%)".to_string(), "25.00".to_string()]));
        assert!(rows
            .iter()
            .any(|r| r == &vec!["Shipping to client (5%)".to_string(), "50.00".to_string()]));
        assert!(rows.iter().any(|r| r == &vec!["Grand total".to_string(), "1,075.00".to_string()]));
    }

    #[test]
    fn sheet_is_localized_and_arabic_is_rtl() {
        let (deal, items, summary) = fixture();
        let sheet = quote_sheet(Locale::Ar, &deal, &items, &summary);
        assert_eq!(sheet.rows()[0], vec!["ستوك شيب".to_string()]);
        assert!(sheet.right_to_left);
        assert!(sheet
            .rows()
            .iter()
            .any(|r| r.first().map(String::as_str) == Some("عرض السعر")));

        let sheet = quote_sheet(Locale::En, &deal, &items, &summary);
        assert!(!sheet.right_to_left);
        assert_eq!(sheet.name, "Price quote");
    }
}
