use std::collections::VecDeque;

use crate::prompt::Prompter;
use crate::utils::Result;

#[derive(Debug)]
pub(crate) enum Answer {
    Select(&'static str),
    Input(&'static str),
    Confirm(bool),
}

/// Replays canned answers and records every question asked.
#[derive(Default)]
pub(crate) struct Scripted {
    answers: VecDeque<Answer>,
    pub(crate) asked: Vec<String>,
    pub(crate) rejected: Vec<String>,
}

impl Scripted {
    pub(crate) fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Prompter for Scripted {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(Answer::Select(pick)) => Ok(items
                .iter()
                .position(|item| item == pick)
                .unwrap_or_else(|| panic!("'{pick}' not offered in {items:?}"))),
            other => panic!("expected a select answer for '{prompt}', got {other:?}"),
        }
    }

    fn input(
        &mut self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        self.asked.push(prompt.to_string());
        loop {
            match self.answers.pop_front() {
                Some(Answer::Input(text)) => match validate(text) {
                    Ok(()) => return Ok(text.to_string()),
                    Err(_) => self.rejected.push(text.to_string()),
                },
                other => panic!("expected an input answer for '{prompt}', got {other:?}"),
            }
        }
    }

    fn confirm(&mut self, prompt: &str, _: bool) -> Result<bool> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(Answer::Confirm(answer)) => Ok(answer),
            other => panic!("expected a confirm answer for '{prompt}', got {other:?}"),
        }
    }
}
