//! Terminal chat front end
//!
//! Line-oriented REPL: the user types a message, the agent runs the turn
//! (including any tool rounds), and the events print in order. The human
//! stays in the loop between turns, like the original console variant.

use std::io::Write;
use std::sync::Arc;

use colored::*;
use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::agent::{display_content, ChatEvent, TurnReport};
use crate::context::AppContext;

/// Longest tool result echoed to the terminal before truncation
const TOOL_RESULT_PREVIEW_CHARS: usize = 800;

/// Run the interactive chat loop until EOF or an exit command
pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let agent = ctx.build_agent();
    let mut history = Vec::new();

    println!("{}", "bistro - restaurant assistant".cyan().bold());
    println!(
        "model: {} | tools: {}",
        agent.model().cyan(),
        agent.tool_names().join(", ").cyan()
    );
    println!("{}", "type a question, or 'exit' to quit, 'clear' to reset".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "clear" => {
                history.clear();
                println!("{}", "conversation cleared".dimmed());
                continue;
            }
            _ => {}
        }

        match agent.run_turn(&mut history, input).await {
            Ok(report) => render_turn(&report),
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
    }

    println!("{}", "bye".dimmed());
    Ok(())
}

fn render_turn(report: &TurnReport) {
    for event in &report.events {
        match event {
            ChatEvent::Assistant { content } => {
                let text = display_content(content);
                if !text.is_empty() {
                    println!("{} {}", "assistant>".cyan().bold(), text);
                }
            }
            ChatEvent::ToolCall { name, arguments } => {
                println!("{} {}({})", "tool>".yellow().bold(), name.yellow(), arguments);
            }
            ChatEvent::ToolResult { name, content, is_error } => {
                if *is_error {
                    println!("{} {} failed: {}", "tool>".yellow().bold(), name.yellow(), content.red());
                } else {
                    println!("{} {} -> {}", "tool>".yellow().bold(), name.yellow(), preview(content).dimmed());
                }
            }
        }
    }

    if report.terminated {
        println!("{}", "task complete".dimmed());
    }
}

/// First chunk of a tool result, enough to follow along without flooding
/// the terminal
fn preview(content: &str) -> String {
    if content.chars().count() <= TOOL_RESULT_PREVIEW_CHARS {
        return content.to_string();
    }
    let truncated: String = content.chars().take(TOOL_RESULT_PREVIEW_CHARS).collect();
    format!("{}... [truncated]", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "x".repeat(TOOL_RESULT_PREVIEW_CHARS + 100);
        let shown = preview(&long);
        assert!(shown.ends_with("[truncated]"));
        assert!(shown.len() < long.len());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(TOOL_RESULT_PREVIEW_CHARS + 10);
        let shown = preview(&long);
        assert!(shown.ends_with("[truncated]"));
    }
}
