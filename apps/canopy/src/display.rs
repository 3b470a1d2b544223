//! Output rendering and formatting

use canopy_api::{NewUser, RegisterOutcome};
use canopy_tree::{LocalNavigation, Outline};
use canopy_types::ContentNode;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use serde::Serialize;
use std::io;

/// A node in a printed tree, with its depth below the tree root
#[derive(Debug, Clone, Serialize)]
pub struct TreeRow {
    pub depth: usize,
    #[serde(flatten)]
    pub node: ContentNode,
}

/// Fragments rendered for one slot
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub slot: String,
    pub fragments: Vec<String>,
}

/// What a command produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutput {
    Tree {
        rows: Vec<TreeRow>,
        outline: Outline,
    },
    Navigation(LocalNavigation),
    Slots {
        page_title: String,
        bare: Option<bool>,
        slots: Vec<SlotReport>,
    },
    Register {
        outcome: RegisterOutcome,
        user: Option<NewUser>,
    },
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            term: Term::stdout(),
        }
    }

    /// Render a command result
    pub fn render_result(&self, result: &CommandOutput) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }
        match result {
            CommandOutput::Tree { rows, .. } => self.render_tree(rows),
            CommandOutput::Navigation(nav) => self.render_navigation(nav),
            CommandOutput::Slots {
                page_title,
                bare,
                slots,
            } => self.render_slots(page_title, *bare, slots),
            CommandOutput::Register { outcome, user } => self.render_register(outcome, user.as_ref()),
        }
    }

    fn colors(&self) -> bool {
        self.term.features().colors_supported()
    }

    fn heading(&self, text: &str) -> String {
        if self.colors() {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        let cells: Vec<Cell> = header
            .iter()
            .map(|title| {
                let cell = Cell::new(title).add_attribute(Attribute::Bold);
                if self.colors() {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect();
        table.set_header(cells);
        table
    }

    fn render_tree(&self, rows: &[TreeRow]) -> io::Result<()> {
        let mut table = self.table(&["Title", "Name", "Position", "Navigation", "Id"]);
        for row in rows {
            let node = &row.node;
            table.add_row(vec![
                Cell::new(format!("{}{}", "  ".repeat(row.depth), node.title)),
                Cell::new(&node.name),
                Cell::new(node.position),
                Cell::new(if node.in_navigation { "yes" } else { "no" }),
                Cell::new(node.id),
            ]);
        }
        println!("{table}");
        Ok(())
    }

    fn render_navigation(&self, nav: &LocalNavigation) -> io::Result<()> {
        let Some(parent) = &nav.parent else {
            println!("No local navigation for this node.");
            return Ok(());
        };
        println!("{}", self.heading(&parent.title));
        for child in &nav.children {
            println!("  - {} ({})", child.title, child.name);
        }
        Ok(())
    }

    fn render_slots(&self, page_title: &str, bare: Option<bool>, slots: &[SlotReport]) -> io::Result<()> {
        println!("{}", self.heading(page_title));
        if bare == Some(true) {
            println!("(bare master template)");
        }
        let mut table = self.table(&["Slot", "Fragments"]);
        for report in slots {
            table.add_row(vec![
                Cell::new(&report.slot),
                Cell::new(report.fragments.join("\n")),
            ]);
        }
        println!("{table}");
        Ok(())
    }

    fn render_register(&self, outcome: &RegisterOutcome, user: Option<&NewUser>) -> io::Result<()> {
        match outcome {
            RegisterOutcome::Redirect { location } => {
                if let Some(user) = user {
                    println!("[OK] Registered {} <{}>", user.name, user.email);
                    if !user.groups.is_empty() {
                        println!("  Groups: {}", user.groups.join(", "));
                    }
                    if !user.roles.is_empty() {
                        let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
                        println!("  Roles: {}", roles.join(", "));
                    }
                }
                println!("  Redirect: {location}");
            }
            RegisterOutcome::Form(form) => {
                if let Some(message) = &form.message {
                    println!("[ERROR] {message}");
                }
                for (field, error) in &form.errors {
                    println!("  {field}: {error}");
                }
                if form.errors.is_empty() {
                    println!("{}", form.render());
                }
            }
        }
        Ok(())
    }
}
