use std::io::Write as _;

use anyhow::Result;
use clap::Parser;
use client_core::{HttpRecordStore, RecordListController, RecordListHandle, RecordListView};
use shared::domain::{RecordDraft, RecordId};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the record endpoint.
    #[arg(long, default_value = "https://jsonplaceholder.typicode.com/users")]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let store = HttpRecordStore::new(args.base_url);
    let mut controller = RecordListController::new(store);
    controller.load().await?;
    info!("initial collection loaded");

    run(&mut controller).await
}

async fn run(handle: &mut impl RecordListHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&handle.view());
    print_help();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "" => continue,
            "quit" | "q" => break,
            "help" => print_help(),
            "list" => render(&handle.view()),
            "reload" => match handle.load().await {
                Ok(()) => render(&handle.view()),
                Err(err) => println!("error: {err}"),
            },
            "search" => {
                handle.set_search_term(rest);
                render(&handle.view());
            }
            "page" => match rest.parse::<usize>() {
                Ok(page) => {
                    handle.set_page(page);
                    render(&handle.view());
                }
                Err(_) => println!("usage: page <number>"),
            },
            "next" => {
                handle.set_page(handle.view().current_page + 1);
                render(&handle.view());
            }
            "prev" => {
                handle.set_page(handle.view().current_page.saturating_sub(1));
                render(&handle.view());
            }
            "add" => match parse_draft(rest) {
                Some(draft) => match handle.create(draft).await {
                    Ok(id) => {
                        println!("created record {}", id.0);
                        render(&handle.view());
                    }
                    Err(err) => println!("error: {err}"),
                },
                None => println!("usage: add <name>; <email>; <phone>"),
            },
            "edit" => match parse_edit(rest) {
                Some((id, draft)) => match handle.update(id, draft).await {
                    Ok(()) => {
                        println!("updated record {}", id.0);
                        render(&handle.view());
                    }
                    Err(err) => println!("error: {err}"),
                },
                None => println!("usage: edit <id> <name>; <email>; <phone>"),
            },
            "del" => match rest.parse::<i64>() {
                Ok(id) => {
                    if confirm_delete(&mut lines, id).await? {
                        match handle.delete(RecordId(id)).await {
                            Ok(()) => {
                                println!("deleted record {id}");
                                render(&handle.view());
                            }
                            Err(err) => println!("error: {err}"),
                        }
                    }
                }
                Err(_) => println!("usage: del <id>"),
            },
            _ => println!("unknown command {command:?}, try help"),
        }
    }
    Ok(())
}

async fn confirm_delete(lines: &mut Lines<BufReader<Stdin>>, id: i64) -> Result<bool> {
    prompt(&format!("delete record {id}? [y/N] "))?;
    let answer = lines.next_line().await?;
    Ok(matches!(answer, Some(answer) if answer.trim().eq_ignore_ascii_case("y")))
}

fn parse_draft(input: &str) -> Option<RecordDraft> {
    let mut parts = input.splitn(3, ';').map(str::trim);
    let name = parts.next()?;
    let email = parts.next()?;
    let phone = parts.next()?;
    Some(RecordDraft::new(name, email, phone))
}

fn parse_edit(input: &str) -> Option<(RecordId, RecordDraft)> {
    let (id, rest) = input.split_once(char::is_whitespace)?;
    let id = id.parse::<i64>().ok()?;
    Some((RecordId(id), parse_draft(rest.trim())?))
}

fn render(view: &RecordListView) {
    if view.visible.is_empty() {
        println!("no records found");
        return;
    }
    println!("{:<6} {:<24} {:<28} {}", "id", "name", "email", "phone");
    for record in &view.visible {
        println!(
            "{:<6} {:<24} {:<28} {}",
            record.id.0, record.name, record.email, record.phone
        );
    }
    let start = (view.current_page - 1) * client_core::PAGE_SIZE + 1;
    let end = start + view.visible.len() - 1;
    println!(
        "showing {start}-{end} of {} | page {} of {}",
        view.total_count, view.current_page, view.total_pages
    );
}

fn print_help() {
    println!("commands:");
    println!("  list                              show the current page");
    println!("  search <term>                     filter by name (empty term clears)");
    println!("  page <n> | next | prev            navigate pages");
    println!("  add <name>; <email>; <phone>      create a record");
    println!("  edit <id> <name>; <email>; <phone> update a record");
    println!("  del <id>                          delete a record (asks first)");
    println!("  reload                            re-fetch the collection");
    println!("  help | quit");
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}
