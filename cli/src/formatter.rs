use crate::FileOutcome;
use aisp::{Binding, Document, Token, ValueShape};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(
            headers
                .iter()
                .map(|header| Cell::new(header).set_alignment(CellAlignment::Left))
                .collect::<Vec<_>>(),
        ));
        table
    }

    /// One row per checked file, followed by a pass count
    pub fn format_check_summary(&self, outcomes: &[FileOutcome]) -> String {
        let mut table = self.table(&[
            "File",
            "Tier",
            "Density",
            "Ambiguity",
            "ZERO/ADAPT/NULL/CRASH",
            "Status",
        ]);

        for outcome in outcomes {
            let status = match &outcome.error {
                Some(error) => format!("{} error at byte {}", error.kind, error.offset),
                None => "ok".to_string(),
            };

            let row = match &outcome.report {
                Some(report) => vec![
                    outcome.path.clone(),
                    format!("{} {}", report.tier.symbol, report.tier.name),
                    format!("{:.3}", report.density),
                    format!("{:.3}", report.ambiguity),
                    format!(
                        "{}/{}/{}/{}",
                        report.bindings.zero,
                        report.bindings.adapt,
                        report.bindings.null,
                        report.bindings.crash
                    ),
                    status,
                ],
                None => vec![
                    outcome.path.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    status,
                ],
            };
            table.add_row(row);
        }

        let passed = outcomes.iter().filter(|outcome| outcome.passed).count();
        format!(
            "{}\n{} of {} document(s) passed\n",
            table,
            passed,
            outcomes.len()
        )
    }

    pub fn format_tokens(&self, tokens: &[Token]) -> String {
        let mut table = self.table(&["Offset", "Kind", "Text", "Symbolic"]);
        for token in tokens {
            table.add_row(vec![
                token.span.start.to_string(),
                token.kind.to_string(),
                token.text.to_string(),
                if token.is_symbolic() { "yes" } else { "" }.to_string(),
            ]);
        }
        format!("{}\n{} token(s)\n", table, tokens.len())
    }

    /// Header, terms and bindings of a classified document
    pub fn format_document_inspection(&self, document: &Document) -> String {
        let mut output = String::new();

        match document.header() {
            Some(header) => output.push_str(&format!(
                "Document: {} (version {}{})\n",
                header.name,
                header.version,
                header
                    .date
                    .as_deref()
                    .map(|date| format!(", {}", date))
                    .unwrap_or_default()
            )),
            None => output.push_str("Document: (no header)\n"),
        }

        let tags: Vec<_> = document
            .block_tags()
            .map(|tag| format!("{:?}", tag))
            .collect();
        output.push_str(&format!(
            "Blocks: {} (completeness {}%)\n",
            if tags.is_empty() {
                "none".to_string()
            } else {
                tags.join(", ")
            },
            document.completeness()
        ));
        output.push_str(&format!(
            "Status: {}\n\n",
            document.status().name()
        ));

        output.push_str(&format!("terms ({}):\n", document.terms().len()));
        let mut terms = self.table(&["Name", "Socket", "Arity", "References"]);
        for term in document.terms() {
            terms.add_row(vec![
                term.name.clone(),
                term.socket
                    .map(|socket| socket.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                term.arity
                    .map(|arity| arity.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                term.references.to_string(),
            ]);
        }
        output.push_str(&format!("{}\n\n", terms));

        output.push_str(&format!("bindings ({}):\n", document.bindings().len()));
        let mut bindings = self.table(&["Offset", "Term", "Op", "Value", "Class"]);
        for binding in document.bindings() {
            bindings.add_row(vec![
                binding.offset.to_string(),
                self.term_name(document, binding),
                format!("{:?}", binding.op).to_lowercase(),
                self.shape(document, binding.value.shape),
                binding
                    .compatibility
                    .map(|class| class.name().to_string())
                    .unwrap_or_else(|| "?".to_string()),
            ]);
        }
        output.push_str(&format!("{}\n", bindings));

        output
    }

    fn term_name(&self, document: &Document, binding: &Binding) -> String {
        document
            .term(binding.term)
            .map(|term| term.name.clone())
            .unwrap_or_default()
    }

    fn shape(&self, document: &Document, shape: ValueShape) -> String {
        match shape {
            ValueShape::Absent => "absent".to_string(),
            ValueShape::Known(socket) => socket.to_string(),
            ValueShape::Reference(term) => format!(
                "→ {}",
                document
                    .term(term)
                    .map(|term| term.name.as_str())
                    .unwrap_or("?")
            ),
        }
    }
}
