//! Interactive session input and the predefined question catalogue.

/// Shortcut keys for frequently asked questions, in display order.
pub const PREDEFINED_QUESTIONS: &[(&str, &str)] = &[
    (
        "crypto",
        "Насколько выше доход у фрилансеров, принимающих оплату в криптовалюте, по сравнению с другими способами оплаты?",
    ),
    (
        "regions",
        "Как распределяется доход фрилансеров в зависимости от региона проживания клиента?",
    ),
    (
        "experts",
        "Какой процент фрилансеров, считающих себя экспертами, выполнил менее 100 проектов?",
    ),
    (
        "payments",
        "Какие способы оплаты наиболее выгодны для фрилансеров?",
    ),
    (
        "overview",
        "Какие данные содержатся в наборе и сколько в нём записей?",
    ),
];

/// Questions walked through by the `demo` command.
pub const DEMO_QUESTIONS: [&str; 3] = [
    "Насколько выше доход у фрилансеров, принимающих оплату в криптовалюте?",
    "Какой процент экспертов выполнил менее 100 проектов?",
    "Какой регион приносит наибольший доход фрилансерам?",
];

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "выход"];

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Quit,
    Help,
    Info,
    History,
    Empty,
    /// A question, with predefined shortcut keys already expanded.
    Question { text: String, predefined: bool },
}

impl SessionInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if QUIT_WORDS.contains(&trimmed.to_lowercase().as_str()) {
            return SessionInput::Quit;
        }

        match trimmed {
            "" => SessionInput::Empty,
            "/help" => SessionInput::Help,
            "/info" => SessionInput::Info,
            "/history" => SessionInput::History,
            _ => match predefined_question(trimmed) {
                Some(text) => SessionInput::Question {
                    text: text.to_string(),
                    predefined: true,
                },
                None => SessionInput::Question {
                    text: trimmed.to_string(),
                    predefined: false,
                },
            },
        }
    }
}

/// Full question text for a shortcut key.
pub fn predefined_question(key: &str) -> Option<&'static str> {
    PREDEFINED_QUESTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, question)| *question)
}
