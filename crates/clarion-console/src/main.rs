//! Clarion console: a readline front end over the clarification backend.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use clarion_application::home::HomeUsecase;
use clarion_application::portal::PortalUsecase;
use clarion_application::prompt::PromptUsecase;
use clarion_application::thread::{ThreadEvent, ThreadUsecase};
use clarion_core::chat::{ChatEntry, Sender};
use clarion_core::config::ConsoleConfig;
use clarion_core::gateway::ClarifyGateway;
use clarion_core::portal::LinkCategory;
use clarion_core::prompt::PromptRole;
use clarion_core::question::{Direction, QuestionBoard};
use clarion_interaction::HttpGateway;

const COMMANDS: &[&str] = &[
    "/projects",
    "/project",
    "/epic",
    "/ticket",
    "/doc",
    "/clarify",
    "/questions",
    "/next",
    "/prev",
    "/resolve",
    "/reply",
    "/suggest",
    "/close",
    "/portal",
    "/prompt",
    "/help",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_entry(entry: &ChatEntry) {
    match entry.sender {
        Sender::Human => println!("{}", format!("[you] {}", entry.content).green()),
        Sender::Agent => {
            for line in entry.content.lines() {
                println!("{}", format!("[agent] {line}").bright_blue());
            }
        }
    }
}

fn print_board(board: &QuestionBoard) {
    if board.is_empty() {
        println!("{}", "No questions yet. Run /clarify first.".bright_black());
        return;
    }
    println!(
        "{}",
        format!(
            "Unresolved questions: {}/{}",
            board.unresolved_count(),
            board.len()
        )
        .yellow()
    );
    for (index, question) in board.questions().iter().enumerate() {
        let marker = if board.focused() == Some(index) { ">" } else { " " };
        let status = if question.is_unresolved() {
            "unresolved".yellow()
        } else {
            "resolved".green()
        };
        println!(
            "{marker} {}. [{status}] {}",
            index + 1,
            question.question
        );
    }
}

async fn print_portal(portal: &PortalUsecase, tab: LinkCategory) {
    let state = portal.state().await;
    let mut alert = state.alert.clone();
    if let Some(alert) = alert.active() {
        println!("{} {}", alert.title.red().bold(), alert.message.red());
    }
    println!("{}", format!("[{tab}] links:").bold());
    for (index, entry) in state.links.entries(tab).iter().enumerate() {
        let shown = if entry.is_empty() { "<empty>" } else { entry };
        println!("  {index}: {shown}");
    }
    if state.table.is_empty() {
        println!("{}", "Dataset: (empty)".bright_black());
    } else {
        println!("{}", "Dataset:".bold());
        for (index, row) in state.table.iter().enumerate() {
            println!("  {}. {} {} {}", index + 1, row.url, row.date, row.status);
        }
    }
}

async fn print_prompt(prompt: &PromptUsecase) {
    let state = prompt.state().await;
    let mut alert = state.alert.clone();
    if let Some(alert) = alert.active() {
        println!("{} {}", alert.title.bold(), alert.message);
    }
    let mode = if state.editing { "Editing..." } else { "Viewing mode" };
    println!("{}", format!("ROLE: {} ({mode})", state.role).bold());
    match &state.template {
        Some(template) => {
            println!("{}", "Contextualize Question System Prompt".underline());
            println!("{}", template.contextualize_q_system_prompt);
            println!("{}", "Question Answering System Prompt".underline());
            println!("{}", template.qa_system_prompt);
        }
        None => println!("{}", "No prompt loaded.".bright_black()),
    }
}

fn print_help() {
    let lines = [
        "/projects                list projects",
        "/project <name>          select a project",
        "/epic <name>             select an epic",
        "/ticket <name>           select a ticket",
        "/doc                     show the ticket document",
        "/clarify                 generate a clarification question",
        "/questions               show the question board",
        "/next | /prev            jump to the next/previous unresolved question",
        "/resolve <n>             toggle resolution of question n",
        "/reply <n>               open the chat thread for question n",
        "/suggest [n]             list suggestions, or send suggestion n",
        "/close                   close the open thread",
        "/portal ...              portal: projects|project|epic|ticket|tab|set|add|submit|table",
        "/prompt ...              prompts: role|edit|ctx|qa|save|show",
        "<text>                   send a message into the open thread",
        "quit                     exit",
    ];
    for line in lines {
        println!("{}", line.bright_black());
    }
}

struct App {
    home: HomeUsecase,
    thread: Arc<ThreadUsecase>,
    portal: PortalUsecase,
    prompt: PromptUsecase,
    portal_tab: LinkCategory,
}

impl App {
    async fn handle(&mut self, line: &str) {
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/projects" => {
                self.home.refresh_projects().await;
                for project in self.home.state().await.selection.projects() {
                    println!("  {project}");
                }
            }
            "/project" => {
                self.home.select_project(rest).await;
                let state = self.home.state().await;
                println!("{}", format!("Epics in {rest}:").bold());
                for epic in state.selection.epics() {
                    println!("  {} ({})", epic.name, epic.key);
                }
            }
            "/epic" => {
                if !self.home.select_epic(rest).await {
                    println!("{}", format!("Unknown epic: {rest}").red());
                    return;
                }
                let state = self.home.state().await;
                println!("{}", "Tickets:".bold());
                for ticket in state.selection.tickets() {
                    println!("  {} ({})", ticket.name, ticket.key);
                }
            }
            "/ticket" => {
                if !self.home.select_ticket(rest).await {
                    println!("{}", format!("Unknown ticket: {rest}").red());
                    return;
                }
                if let Some(content) = self.home.state().await.selection.content() {
                    println!("{}", content.title.bold());
                }
            }
            "/doc" => match self.home.state().await.selection.content() {
                Some(content) => {
                    println!("{}", content.title.bold());
                    println!("{}", content.content);
                }
                None => println!("{}", "No ticket selected.".bright_black()),
            },
            "/clarify" => {
                if self.home.clarify().await {
                    print_board(&self.home.state().await.board);
                } else {
                    println!("{}", "Could not generate a question (select a ticket first).".red());
                }
            }
            "/questions" => {
                self.home.reload_questions().await;
                print_board(&self.home.state().await.board);
            }
            "/next" | "/prev" => {
                let direction = if command == "/next" {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                match self.home.advance(direction).await {
                    Some(index) => {
                        // The landed entry is "scrolled into view" by
                        // re-rendering the board around it.
                        print_board(&self.home.state().await.board);
                        println!("{}", format!("Focused question {}", index + 1).yellow());
                    }
                    None => println!("{}", "No unresolved questions.".bright_black()),
                }
            }
            "/resolve" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    if self.home.toggle_resolved(n - 1).await {
                        print_board(&self.home.state().await.board);
                    } else {
                        println!("{}", "Status update failed; board unchanged.".red());
                    }
                }
                _ => println!("{}", "Usage: /resolve <n>".bright_black()),
            },
            "/reply" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    let (scope, question) = {
                        let state = self.home.state().await;
                        (
                            state.selection.scope(),
                            state.board.get(n - 1).cloned(),
                        )
                    };
                    match (scope, question) {
                        (Some(scope), Some(question)) => {
                            println!("{}", format!("Question: {}", question.question).bold());
                            self.thread.open(scope, question).await;
                        }
                        _ => println!("{}", "Select a ticket and question first.".red()),
                    }
                }
                _ => println!("{}", "Usage: /reply <n>".bright_black()),
            },
            "/suggest" => {
                if rest.is_empty() {
                    let state = self.thread.state().await;
                    if state.suggestions.is_empty() {
                        println!("{}", "No suggestions.".bright_black());
                    }
                    for (index, suggestion) in state.suggestions.iter().enumerate() {
                        println!("  {index}: {suggestion}");
                    }
                } else if let Ok(index) = rest.parse::<usize>() {
                    if !self.thread.send_suggestion(index).await {
                        println!("{}", "No such suggestion.".red());
                    }
                }
            }
            "/close" => {
                self.thread.close().await;
                println!("{}", "Thread closed.".bright_black());
            }
            "/portal" => self.handle_portal(rest).await,
            "/prompt" => self.handle_prompt(rest).await,
            "/help" => print_help(),
            _ => {
                if command.starts_with('/') {
                    println!("{}", "Unknown command".bright_black());
                } else if self.thread.state().await.is_open() {
                    self.thread.send(line).await;
                } else {
                    println!("{}", "No open thread. Use /reply <n> first.".bright_black());
                }
            }
        }
    }

    async fn handle_portal(&mut self, rest: &str) {
        let (sub, args) = match rest.split_once(' ') {
            Some((sub, args)) => (sub, args.trim()),
            None => (rest, ""),
        };
        match sub {
            "" | "show" => print_portal(&self.portal, self.portal_tab).await,
            "projects" => {
                self.portal.refresh_projects().await;
                for project in self.portal.state().await.selection.projects() {
                    println!("  {project}");
                }
            }
            "project" => {
                self.portal.select_project(args).await;
                print_portal(&self.portal, self.portal_tab).await;
            }
            "epic" => {
                if !self.portal.select_epic(args).await {
                    println!("{}", format!("Unknown epic: {args}").red());
                }
            }
            "ticket" => {
                if !self.portal.select_ticket(args).await {
                    println!("{}", format!("Unknown ticket: {args}").red());
                }
            }
            "tab" => match args.parse::<LinkCategory>() {
                Ok(tab) => {
                    self.portal_tab = tab;
                    print_portal(&self.portal, self.portal_tab).await;
                }
                Err(_) => println!("{}", "Tabs: jira, confluence, docs, github".bright_black()),
            },
            "set" => {
                let parsed = args
                    .split_once(' ')
                    .and_then(|(index, url)| index.parse::<usize>().ok().map(|i| (i, url.trim())));
                match parsed {
                    Some((index, url)) => {
                        self.portal.edit_link(self.portal_tab, index, url).await;
                        print_portal(&self.portal, self.portal_tab).await;
                    }
                    None => println!("{}", "Usage: /portal set <index> <url>".bright_black()),
                }
            }
            "add" => {
                if !self.portal.add_placeholder(self.portal_tab).await {
                    println!("{}", "This tab is full.".red());
                }
            }
            "submit" => {
                if self.portal.submit().await {
                    println!("{}", "Links submitted.".green());
                } else {
                    println!("{}", "Submit failed (select a project first).".red());
                }
            }
            "table" => {
                self.portal.refresh_table().await;
                print_portal(&self.portal, self.portal_tab).await;
            }
            _ => println!("{}", "Usage: /portal projects|project|epic|ticket|tab|set|add|submit|table".bright_black()),
        }
    }

    async fn handle_prompt(&mut self, rest: &str) {
        let (sub, args) = match rest.split_once(' ') {
            Some((sub, args)) => (sub, args.trim()),
            None => (rest, ""),
        };
        match sub {
            "" | "show" => print_prompt(&self.prompt).await,
            "role" => match args.parse::<PromptRole>() {
                Ok(role) => {
                    self.prompt.select_role(role).await;
                    print_prompt(&self.prompt).await;
                }
                Err(_) => println!("{}", "Roles: CLARIFY, CHAT, SUGGESTION".bright_black()),
            },
            "edit" => {
                if self.prompt.edit().await {
                    println!("{}", "Editing...".yellow());
                } else {
                    println!("{}", "Load a prompt first (/prompt role <ROLE>).".red());
                }
            }
            "ctx" => {
                if !self.prompt.set_contextualize(args).await {
                    println!("{}", "Not in edit mode.".red());
                }
            }
            "qa" => {
                if !self.prompt.set_qa(args).await {
                    println!("{}", "Not in edit mode.".red());
                }
            }
            "save" => {
                if self.prompt.save().await {
                    println!("{}", "Prompt saved successfully!".green());
                } else {
                    println!("{}", "Save failed.".red());
                }
                print_prompt(&self.prompt).await;
            }
            _ => println!("{}", "Usage: /prompt role|edit|ctx|qa|save|show".bright_black()),
        }
    }
}

/// The main entry point for the Clarion readline console.
///
/// Sets up tracing, loads the config, wires the usecases to the HTTP
/// gateway, spawns the transcript watcher, and runs the REPL loop.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ConsoleConfig::load()?;
    tracing::info!(base_url = %config.backend.base_url, "starting clarion console");

    let gateway: Arc<dyn ClarifyGateway> =
        Arc::new(HttpGateway::new(config.backend.base_url.clone()));
    let home = HomeUsecase::new(gateway.clone());
    let (thread, mut events) = ThreadUsecase::new(gateway.clone(), config.polling.interval());
    let thread = Arc::new(thread);
    let portal = PortalUsecase::new(gateway.clone(), &config);
    let prompt = PromptUsecase::new(gateway.clone(), &config);

    // Print transcript updates as the poller surfaces them. The transcript
    // is replaced wholesale on every tick, so only the tail beyond what was
    // already rendered is printed (the console equivalent of
    // scroll-to-bottom).
    let watcher = Arc::clone(&thread);
    tokio::spawn(async move {
        let mut rendered = 0usize;
        while let Some(event) = events.recv().await {
            match event {
                ThreadEvent::TranscriptUpdated => {
                    let state = watcher.state().await;
                    let entries = state.transcript.entries();
                    if entries.len() < rendered {
                        rendered = 0;
                    }
                    for entry in &entries[rendered..] {
                        print_entry(entry);
                    }
                    rendered = entries.len();
                }
                ThreadEvent::SuggestionReady => {
                    println!("{}", "A suggestion is available: /suggest".bright_magenta());
                }
            }
        }
    });

    let mut app = App {
        home,
        thread,
        portal,
        prompt,
        portal_tab: LinkCategory::Jira,
    };

    app.home.refresh_projects().await;

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Clarion ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline("clarion> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);
                app.handle(trimmed).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Stop the poller before exiting so no request outlives the console.
    app.thread.close().await;

    Ok(())
}
