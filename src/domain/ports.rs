use crate::domain::model::Record;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(&self, collection: &str, limit: usize) -> Result<Vec<Record>>;
}

/// Sink for human-readable status lines.
pub trait Reporter {
    fn report(&mut self, line: &str);
}

impl Reporter for Vec<String> {
    fn report(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, line: &str) {
        println!("{}", line);
    }
}
