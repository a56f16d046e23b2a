use anyhow::{Context, Result};
use complete_core::ingest::ingest_file;
use complete_core::persistence::DictionaryStore;
use complete_core::{AutocompleteConfig, Candidate, FuzzyAutocomplete};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Write};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let config = AutocompleteConfig::load().context("failed to load configuration")?;
    let store = DictionaryStore::new(&config.dictionary_dir);
    let dict_path = store
        .path_for(&config.dictionary_id)
        .context("bad dictionary_id in configuration")?;
    log::info!("dictionary: {}", dict_path.display());

    let mut engine = FuzzyAutocomplete::from_file_or_new(&dict_path, &config);
    let mut query = String::new();
    let mut status = String::from("Type a phrase to get suggestions.");

    loop {
        let suggestions = engine.autocomplete_default(&query);
        print_ui(&query, &suggestions, &status, &engine)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim_end_matches(['\r', '\n']);

        match cmd {
            "exit" => break,
            ":stats" => {
                let trie = engine.trie();
                status = format!(
                    "{} sentences, {} insertions, {} nodes, max distance {}",
                    trie.len(),
                    trie.total_insertions(),
                    trie.node_count(),
                    engine.max_edit_distance()
                );
            }
            ":save" => {
                status = match engine.save_dictionary() {
                    Ok(()) => format!("Saved to '{}'", dict_path.display()),
                    Err(e) => format!("Could not save: {e}"),
                };
            }
            s if s.starts_with(":add ") => {
                let sentence = &s[":add ".len()..];
                status = if engine.insert(sentence) {
                    format!("Added '{}'", sentence.trim())
                } else {
                    "Nothing to add.".to_string()
                };
            }
            s if s.starts_with(":load ") => {
                let path = Path::new(s[":load ".len()..].trim());
                status = match ingest_file(&mut engine, path) {
                    Ok(n) => format!("Loaded {n} sentences from '{}'", path.display()),
                    Err(e) => format!("Could not load '{}': {e}", path.display()),
                };
            }
            s if s.starts_with(":pick ") => {
                let picked = s[":pick ".len()..]
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0 && n <= suggestions.len())
                    .map(|n| suggestions[n - 1].text.clone());
                status = match picked {
                    Some(text) => {
                        engine.record_selection(&text);
                        query.clear();
                        format!("Selected '{text}'")
                    }
                    None => "No such suggestion.".to_string(),
                };
            }
            s => {
                let (fitted, cut) = config.fit_query(s);
                query = fitted.to_string();
                if cut {
                    status = format!(
                        "Query cut to {} characters at edit distance {}.",
                        config.query_char_limit(),
                        engine.max_edit_distance()
                    );
                }
            }
        }
    }

    println!("\nSaving dictionary...");
    engine
        .save_dictionary()
        .with_context(|| format!("could not save dictionary to {}", dict_path.display()))?;
    println!("Dictionary saved to '{}'", dict_path.display());
    Ok(())
}

fn print_ui(
    query: &str,
    suggestions: &[Candidate],
    status: &str,
    engine: &FuzzyAutocomplete,
) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Phrase Complete".bold());
    println!("---------------------------------------------------------------");
    println!("Type a query and press [Enter]. ':add <sentence>', ':load <file>',");
    println!("':pick <n>', ':stats', ':save'. 'exit' to save and quit.\n");
    println!("{}", status.dark_grey());

    println!("\nQuery: [{}]", query);
    if query.is_empty() {
        println!("\n{} sentences stored.", engine.trie().len());
    } else if suggestions.is_empty() {
        println!("\nNo suggestions found.");
    } else {
        println!("\nSuggestions:");
        for (i, c) in suggestions.iter().enumerate() {
            let text = if c.distance == 0 { c.text.as_str().green() } else { c.text.as_str().yellow() };
            println!("  {}: {} (freq: {}, dist: {})", i + 1, text, c.frequency, c.distance);
        }
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
