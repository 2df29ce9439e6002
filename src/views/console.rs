//! Console View - Product Management in the Terminal
//!
//! Reads one command per line, forwards it to the catalog, and redraws
//! whenever the catalog reports a change.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::domain::form::{Field, ProductForm};
use crate::domain::product::{Product, ProductId};
use crate::error::{Error, Result};
use crate::services::{CatalogEvent, ProductBackend};
use crate::state::{Catalog, CatalogState};
use crate::utils::format::{format_price, format_time, truncate};
use crate::views::pager::Pager;

const FORM_FIELDS: [Field; 4] = [Field::Name, Field::Description, Field::Price, Field::Stock];

const HELP: &str = "\
Commands:
  next | prev                 move between pages
  page N                      jump to page N
  size N                      show N products per page
  search [TERM]               search by name (no term clears)
  add NAME|DESCRIPTION|PRICE|STOCK
  edit ID NAME|DESCRIPTION|PRICE|STOCK   (empty fields keep current values)
  delete ID
  show | help | quit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Page(u32),
    Size(u32),
    Search(String),
    Add(ProductForm),
    /// Ids stay as typed until resolved against the current page
    Edit {
        id: String,
        changes: Vec<(Field, String)>,
    },
    Delete(String),
    Show,
    Help,
    Quit,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Invalid {
        message: message.into(),
    }
}

fn parse_number(arg: &str, what: &str) -> Result<u32> {
    arg.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid(format!("{what} must be a positive number")))
}

/// Split `NAME|DESCRIPTION|PRICE|STOCK`; missing trailing segments are empty
fn split_fields(input: &str) -> Vec<(Field, String)> {
    let mut segments = input.split('|');
    FORM_FIELDS
        .iter()
        .map(|field| (*field, segments.next().unwrap_or("").trim().to_string()))
        .collect()
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word.to_lowercase().as_str() {
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "page" => parse_number(rest, "Page").map(Command::Page),
        "size" => parse_number(rest, "Page size").map(Command::Size),
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "add" => {
            let mut form = ProductForm::new();
            for (field, value) in split_fields(rest) {
                form.set(field, value);
            }
            Ok(Command::Add(form))
        }
        "edit" => {
            let (id, fields) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if id.is_empty() {
                return Err(invalid("edit needs a product id"));
            }
            let changes = split_fields(fields)
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .collect();
            Ok(Command::Edit {
                id: id.to_string(),
                changes,
            })
        }
        "delete" | "rm" => {
            if rest.is_empty() {
                return Err(invalid("delete needs a product id"));
            }
            Ok(Command::Delete(rest.to_string()))
        }
        "show" | "" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(invalid(format!("Unknown command: {other} (try help)"))),
    }
}

/// Draw the whole catalog
pub fn render(state: &CatalogState, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== Product Management ({}) ==", format_time(&chrono::Local::now()))?;
    if !state.search_term().is_empty() {
        writeln!(out, "Search: {}", state.search_term())?;
    }
    if let Some(error) = state.error() {
        writeln!(out, "! {error}")?;
    }
    if state.loading() {
        writeln!(out, "Loading...")?;
        return Ok(());
    }

    if state.products().is_empty() {
        writeln!(out, "No products found")?;
    }
    for product in state.products() {
        writeln!(
            out,
            "[{}] {} - {}",
            product.id,
            product.name,
            truncate(&product.description, 60)
        )?;
        writeln!(
            out,
            "    Price: {}  Stock: {}",
            format_price(product.price),
            product.stock
        )?;
    }
    writeln!(out, "{}  (size {})", Pager::from_state(state).label(), state.page_size())
}

/// The product on the current page whose id is written exactly as `input`
fn product_on_page<'a>(state: &'a CatalogState, input: &str) -> Option<&'a Product> {
    state.products().iter().find(|p| p.id.to_string() == input)
}

/// Id for user input: the matching product's id, otherwise the input verbatim
pub fn resolve_id(state: &CatalogState, input: &str) -> ProductId {
    product_on_page(state, input)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| ProductId::from(input))
}

/// Draw for every event that leaves the catalog settled
///
/// A fetch settles with `LoadingChanged { loading: false }`. Mutation
/// failures are reported afterwards with their own `ErrorOccurred`. A frame
/// identical to the previous one is not drawn again.
pub fn redraw<B: ProductBackend>(
    catalog: &Catalog<B>,
    events: impl IntoIterator<Item = CatalogEvent>,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let mut last: Option<CatalogState> = None;
    for event in events {
        match event {
            CatalogEvent::LoadingChanged { loading: true } => {
                last = None;
                writeln!(out, "Loading...")?;
            }
            CatalogEvent::LoadingChanged { loading: false }
            | CatalogEvent::ErrorOccurred { .. } => {
                let state = catalog.snapshot();
                if !state.loading() && last.as_ref() != Some(&state) {
                    render(&state, out)?;
                    last = Some(state);
                }
            }
            CatalogEvent::PageLoaded { .. } | CatalogEvent::QueryChanged(_) => {}
        }
        out.flush()?;
    }
    Ok(())
}

fn print_line(message: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{message}");
}

fn render_to_stdout(state: &CatalogState) {
    let mut out = std::io::stdout().lock();
    let _ = render(state, &mut out);
    let _ = out.flush();
}

/// Terminal front-end over a catalog
pub struct ConsoleView<B> {
    catalog: Catalog<B>,
}

impl<B: ProductBackend> ConsoleView<B> {
    pub fn new(catalog: Catalog<B>) -> Self {
        Self { catalog }
    }

    /// Redraw on stdout whenever a fetch settles
    fn start_renderer(&self) {
        let events = self.catalog.subscribe();
        let catalog = self.catalog.clone();
        std::thread::spawn(move || {
            if let Err(e) = redraw(&catalog, events.iter(), &mut std::io::stdout()) {
                debug!(error = %e, "Renderer stopped");
            }
        });
    }

    /// Run until `quit` or end of input
    pub async fn run(self) -> Result<()> {
        self.start_renderer();
        print_line(HELP);
        self.catalog.mount();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.dispatch(command).await,
                Err(e) => print_line(&e.to_string()),
            }
        }

        info!("Console view closed");
        Ok(())
    }

    async fn dispatch(&self, command: Command) {
        debug!(?command, "Console command");
        let state = self.catalog.snapshot();
        let pager = Pager::from_state(&state);

        match command {
            Command::Next => match pager.next() {
                Some(page) => self.changed(self.catalog.set_current_page(page).is_some()),
                None => print_line("Already on the last page"),
            },
            Command::Prev => match pager.previous() {
                Some(page) => self.changed(self.catalog.set_current_page(page).is_some()),
                None => print_line("Already on the first page"),
            },
            Command::Page(page) => self.changed(self.catalog.set_current_page(page).is_some()),
            Command::Size(size) => self.changed(self.catalog.set_page_size(size).is_some()),
            Command::Search(term) => self.changed(self.catalog.set_search_term(term).is_some()),
            Command::Add(form) => self.submit(&form, None).await,
            Command::Edit { id, changes } => {
                let Some(product) = product_on_page(&state, &id) else {
                    print_line(&format!("No product {id} on this page"));
                    return;
                };
                let mut form = ProductForm::from_product(product);
                for (field, value) in changes {
                    form.set(field, value);
                }
                self.submit(&form, Some(&product.id)).await;
            }
            Command::Delete(id) => {
                let id = resolve_id(&state, &id);
                self.catalog.delete_product(&id).await
            }
            Command::Show => render_to_stdout(&state),
            Command::Help => print_line(HELP),
            Command::Quit => {}
        }
    }

    /// Redraw right away when a setter did not trigger a fetch
    fn changed(&self, fetching: bool) {
        if !fetching {
            render_to_stdout(&self.catalog.snapshot());
        }
    }

    async fn submit(&self, form: &ProductForm, editing: Option<&ProductId>) {
        if let Err(errors) = self.catalog.submit(form, editing).await {
            for (field, message) in errors.iter() {
                print_line(&format!("  {}: {message}", field.label()));
            }
        }
    }
}
