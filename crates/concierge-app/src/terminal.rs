//! Interactive terminal chat.
//!
//! Drives one [`SessionManager`] from stdin. Plain lines are sent as user
//! messages; slash commands map to the widget's buttons.

use concierge_chat::SessionManager;
use concierge_core::{Sender, Visibility};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: /open /close /minimize /restore /end /email /action <id> /actions /quit";

/// One line of terminal input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Open,
    Close,
    Minimize,
    Restore,
    End,
    Email,
    Action(&'a str),
    Actions,
    Help,
    Quit,
    Say(&'a str),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Say(line));
    };

    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((rest, ""));
    let command = match name {
        "open" => Command::Open,
        "close" => Command::Close,
        "minimize" => Command::Minimize,
        "restore" => Command::Restore,
        "end" => Command::End,
        "email" => Command::Email,
        "action" if !arg.is_empty() => Command::Action(arg),
        "actions" => Command::Actions,
        "quit" | "exit" => Command::Quit,
        _ => Command::Help,
    };
    Some(command)
}

/// Prints transcript messages as they appear.
struct Printer {
    printed: usize,
}

impl Printer {
    fn flush(&mut self, manager: &SessionManager) {
        let snapshot = manager.snapshot();
        // Transcript was cleared by a reset.
        if snapshot.transcript.len() < self.printed {
            self.printed = 0;
        }
        for message in &snapshot.transcript[self.printed..] {
            let prefix = match message.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
            };
            for line in message.lines() {
                println!("{}> {}", prefix, line);
            }
            for (i, option) in message.options.iter().enumerate() {
                println!("    [{}] {}", i + 1, option);
            }
        }
        self.printed = snapshot.transcript.len();
    }
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run(manager: SessionManager) -> std::io::Result<()> {
    let mut printer = Printer { printed: 0 };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    manager.open();
    printer.flush(&manager);

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            continue;
        };
        let before = manager.snapshot().visibility;

        match command {
            Command::Open => {
                manager.open();
            }
            Command::Close => {
                manager.close();
            }
            Command::Minimize => {
                manager.minimize();
            }
            Command::Restore => {
                manager.restore();
            }
            Command::End => {
                manager.end_chat();
            }
            Command::Email => match manager.compose_support_email() {
                Some(url) => println!("(mail client opened: {})", url),
                None => println!("(could not open a mail client)"),
            },
            Command::Action(id) => {
                if !manager.click_quick_action(id).await {
                    println!("(quick action not available: {})", id);
                }
            }
            Command::Actions => {
                for action in manager.quick_actions() {
                    println!("    {}  {}", action.id, action.label);
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Say(text) => {
                if !manager.send_message(text).await {
                    tracing::debug!("Message not accepted");
                }
            }
        }

        let after = manager.snapshot().visibility;
        if after != before {
            println!("(chat {})", visibility_label(after));
        }
        printer.flush(&manager);
    }

    manager.shutdown();
    Ok(())
}

fn visibility_label(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Open => "open",
        Visibility::Minimized => "minimized",
        Visibility::Closed => "closed",
    }
}
