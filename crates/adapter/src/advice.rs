//! Advice sources available to the host.

use crate::config::GameConfig;
use crate::core::{AdviceError, AdviceSource};
use crate::types::Language;

const PROVERBS_EN: &[&str] = &[
    "Free the tall stacks first; they hide the most tiles.",
    "Keep one dock slot open whenever you can.",
    "A tile with a twin in the dock is always a safe pick.",
    "Ends of long rows unlock the middle.",
];

const PROVERBS_RU: &[&str] = &[
    "Сначала разбирайте высокие башни: они прячут больше всего плиток.",
    "Старайтесь держать одну ячейку дока свободной.",
    "Плитка, пара которой уже в доке, всегда безопасна.",
    "Края длинных рядов открывают середину.",
];

const PROVERBS_UZ: &[&str] = &[
    "Avval baland minoralarni bo'shating: ular ko'p toshni yashiradi.",
    "Dokda doim bitta bo'sh joy qoldirishga harakat qiling.",
    "Jufti dokda turgan tosh doim xavfsiz tanlov.",
    "Uzun qatorlarning chetlari o'rtani ochadi.",
];

/// Offline advice: cycles through a fixed list per language
#[derive(Debug, Default)]
pub struct ProverbAdvice {
    next: usize,
}

impl ProverbAdvice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdviceSource for ProverbAdvice {
    fn advice(&mut self, language: Language) -> Result<String, AdviceError> {
        let lines = match language {
            Language::En => PROVERBS_EN,
            Language::Ru => PROVERBS_RU,
            Language::Uz => PROVERBS_UZ,
        };
        let text = lines[self.next % lines.len()];
        self.next = self.next.wrapping_add(1);
        Ok(text.to_string())
    }
}

/// Stand-in for a remote source that was never given a credential
#[derive(Debug, Default)]
pub struct MissingCredentialAdvice;

impl AdviceSource for MissingCredentialAdvice {
    fn advice(&mut self, _language: Language) -> Result<String, AdviceError> {
        Err(AdviceError::MissingCredential)
    }
}

pub fn advice_source(config: &GameConfig) -> Box<dyn AdviceSource + Send> {
    if config.advice_disabled {
        Box::new(MissingCredentialAdvice)
    } else {
        Box::new(ProverbAdvice::new())
    }
}
