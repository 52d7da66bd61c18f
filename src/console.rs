//! Terminal output: banners, spinners and dataset tables.

use crate::analysis::models::DatasetInfo;
use crate::memory::HistoryEntry;
use crate::session::PREDEFINED_QUESTIONS;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner shown while a question is processed.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a titled block of text.
pub fn print_panel(title: &str, body: &str) {
    println!("\n── {} ──", title);
    println!("{}", body.trim_end());
}

pub fn print_dataset_info(info: &DatasetInfo) {
    print_panel(
        "Информация о данных",
        &format!(
            "• Всего записей: {}\n• Колонок в данных: {}",
            info.total_records,
            info.columns.len()
        ),
    );

    let width = info
        .columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max("Колонка".chars().count());

    println!("\n{:<width$}  {:<10}  {}", "Колонка", "Тип", "Пропуски", width = width);
    for column in &info.columns {
        let data_type = info
            .data_types
            .get(column)
            .map(|t| t.as_str())
            .unwrap_or("?");
        let missing = info.missing_values.get(column).copied().unwrap_or(0);
        println!("{:<width$}  {:<10}  {}", column, data_type, missing, width = width);
    }
}

pub fn print_predefined_questions() {
    println!("\nПредустановленные запросы:");
    for (key, question) in PREDEFINED_QUESTIONS {
        println!("  {:<10} {}", key, question);
    }
    println!("Введите ключ из первого столбца для быстрого запуска анализа.");
}

pub fn print_help() {
    println!(
        "Доступные команды: /help, /info, /history, quit, exit, выход, ключ предустановленного запроса"
    );
}

/// Questions asked so far, with local time.
pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("История вопросов пуста.");
        return;
    }

    println!("\nИстория вопросов:");
    for (i, entry) in entries.iter().enumerate() {
        let asked_at = entry.asked_at.with_timezone(&chrono::Local);
        println!("  {:>2}. [{}] {}", i + 1, asked_at.format("%H:%M:%S"), entry.question);
    }
}
