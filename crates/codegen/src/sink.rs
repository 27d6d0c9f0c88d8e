//! Statement sinks
//!
//! Renderers hand each finished statement to a [`StatementSink`]. The
//! loader's `load` uses [`SqlText`]; tests and tools that want to look at
//! individual statements use a [`Recorder`].

use std::collections::BTreeMap;

/// One rendered `CREATE TABLE` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Table the statement creates
    pub table: String,

    /// The statement text, without delimiter
    pub sql: String,

    /// Comment line emitted ahead of the statement (without newline)
    pub comment: Option<String>,
}

/// Receives rendered statements in emission order
pub trait StatementSink {
    fn push(&mut self, statement: Statement);
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    fn push(&mut self, statement: Statement) {
        (**self).push(statement);
    }
}

impl StatementSink for Vec<Statement> {
    fn push(&mut self, statement: Statement) {
        Vec::push(self, statement);
    }
}

// ============================================================================
// SqlText
// ============================================================================

/// Concatenates statements into one script
#[derive(Debug, Clone)]
pub struct SqlText {
    delimiter: String,
    text: String,
}

impl SqlText {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            text: String::new(),
        }
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl StatementSink for SqlText {
    fn push(&mut self, statement: Statement) {
        if let Some(comment) = &statement.comment {
            self.text.push_str(comment);
            self.text.push('\n');
        }
        self.text.push_str(&statement.sql);
        self.text.push_str(&self.delimiter);
        self.text.push('\n');
    }
}

// ============================================================================
// Recorder
// ============================================================================

const DEFAULT_SESSION: &str = "default";

/// Captures statements into named sessions
///
/// ```rust,ignore
/// let mut recorder = Recorder::new();
/// loader.load_into(&models, &mut recorder.in_session("pg"))?;
/// assert_eq!(recorder.statements("pg").len(), 2);
/// recorder.reset("pg");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    sessions: BTreeMap<String, Vec<Statement>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records into the named session
    pub fn in_session(&mut self, session: impl Into<String>) -> SessionSink<'_> {
        let statements = self.sessions.entry(session.into()).or_default();
        SessionSink { statements }
    }

    /// Statements captured in a session, oldest first
    pub fn statements(&self, session: &str) -> &[Statement] {
        self.sessions
            .get(session)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of the sessions that captured something
    pub fn sessions(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    /// Forget everything captured in a session
    pub fn reset(&mut self, session: &str) {
        self.sessions.remove(session);
    }

    /// Forget every session
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}

impl StatementSink for Recorder {
    fn push(&mut self, statement: Statement) {
        self.in_session(DEFAULT_SESSION).push(statement);
    }
}

/// Sink handle for one recorder session
#[derive(Debug)]
pub struct SessionSink<'a> {
    statements: &'a mut Vec<Statement>,
}

impl StatementSink for SessionSink<'_> {
    fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(table: &str) -> Statement {
        Statement {
            table: table.to_string(),
            sql: format!("CREATE TABLE {table} (id INT)"),
            comment: None,
        }
    }

    #[test]
    fn test_sql_text() {
        let mut sink = SqlText::new("\nGO");
        sink.push(Statement {
            comment: Some("-- hello".to_string()),
            ..statement("a")
        });
        sink.push(statement("b"));
        assert_eq!(
            sink.into_string(),
            "-- hello\nCREATE TABLE a (id INT)\nGO\nCREATE TABLE b (id INT)\nGO\n"
        );
    }

    #[test]
    fn test_recorder_sessions() {
        let mut recorder = Recorder::new();
        recorder.in_session("one").push(statement("a"));
        recorder.in_session("one").push(statement("b"));
        recorder.in_session("two").push(statement("c"));

        assert_eq!(recorder.statements("one").len(), 2);
        assert_eq!(recorder.statements("two")[0].table, "c");
        assert_eq!(recorder.sessions().collect::<Vec<_>>(), vec!["one", "two"]);

        recorder.reset("one");
        assert!(recorder.statements("one").is_empty());
        assert_eq!(recorder.statements("two").len(), 1);
    }

    #[test]
    fn test_recorder_default_session() {
        let mut recorder = Recorder::new();
        recorder.push(statement("a"));
        assert_eq!(recorder.statements(DEFAULT_SESSION).len(), 1);

        recorder.clear();
        assert_eq!(recorder.sessions().count(), 0);
    }
}
