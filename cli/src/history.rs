use marmita_core::{format_day, format_money, MonthlyHistory};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Meal box")]
    answer: String,
    #[tabled(rename = "Price")]
    price: String,
}

pub fn show_history(months: &[MonthlyHistory], currency: &str) {
    if months.is_empty() {
        println!("No records yet.");
        return;
    }

    for month in months {
        println!(
            "\n\x1b[1;36m{}\x1b[0m ({} meal boxes, {})",
            month.month.label(),
            month.summary.count,
            format_money(month.summary.total, currency)
        );

        // newest day first, like the month list
        let rows: Vec<HistoryRow> = month
            .days
            .iter()
            .rev()
            .map(|day| HistoryRow {
                date: format_day(day.date),
                weekday: day.date.format("%a").to_string(),
                answer: if day.purchased { "yes".to_string() } else { "no".to_string() },
                price: day
                    .price
                    .map(|p| format_money(p, currency))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

        println!("{}", table);
    }
}
