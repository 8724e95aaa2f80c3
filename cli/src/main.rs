use anyhow::Result;
use clap::Parser;
use libmabiao_core::{CodeTable, Config, Entry, KeyEvent, KeyResult, Snapshot, TypingSession};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(about = "Interactive demo for table-based input schemes")]
struct Args {
    /// Code table file (.tsv/.txt, .json, or a compiled artifact).
    /// Falls back to a small built-in demo table.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Scheme configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum code length.
    #[arg(long)]
    max_len: Option<usize>,

    /// Override the delayed-top pop length (0 = fixed-length top).
    #[arg(long)]
    pop_len: Option<usize>,

    /// Override the candidates-per-page count.
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let table = match &args.table {
        Some(path) => {
            let table = CodeTable::load(path)?;
            println!("loaded {} entries from {}", table.len(), path.display());
            table
        }
        None => {
            println!("no --table given, using the built-in demo table");
            demo_table()
        }
    };

    let mut config = match &args.config {
        Some(path) => Config::load_toml(path).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => Config::default(),
    };
    if let Some(n) = args.max_len {
        config.max_code_len = n;
    }
    if let Some(n) = args.pop_len {
        config.pop_len = n;
    }
    if let Some(n) = args.page_size {
        config.set_page_size(n);
    }

    let mut session = TypingSession::new(Arc::new(table), config);
    repl(&mut session)
}

fn demo_table() -> CodeTable {
    CodeTable::new(vec![
        Entry::new("a", "日"),
        Entry::new("ab", "明"),
        Entry::new("ab", "萌"),
        Entry::new("abc", "晶"),
        Entry::new("b", "月"),
        Entry::new("ba", "朋"),
        Entry::new("h", "人"),
        Entry::new("ha", "从"),
        Entry::new("haa", "众"),
        Entry::new("k", "口"),
        Entry::new("kk", "吕"),
        Entry::new("kkk", "品"),
    ])
}

fn repl(session: &mut TypingSession) -> Result<()> {
    let mut out = io::stdout();
    writeln!(out, "mabiao demo | 逐字符输入，空格/数字选重")?;
    writeln!(
        out,
        "命令：:q 退出 | :bs 退格 | :esc 清码 | :next/:prev 翻页 | :reset 清屏"
    )?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        out.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches(['\n', '\r']);
        match input {
            ":q" | ":quit" | ":exit" => break,
            ":bs" => {
                session.process_key(KeyEvent::Backspace);
            }
            ":esc" => {
                session.process_key(KeyEvent::Escape);
            }
            ":next" => {
                session.process_key(KeyEvent::PageDown);
            }
            ":prev" => {
                session.process_key(KeyEvent::PageUp);
            }
            ":reset" => session.reset(),
            _ => {
                for ch in input.chars() {
                    if session.process_key(KeyEvent::Char(ch)) == KeyResult::NotHandled {
                        writeln!(out, "(忽略未处理按键 {:?})", ch)?;
                    }
                }
            }
        }
        print_snapshot(&mut out, &session.snapshot(), session.config())?;
    }
    Ok(())
}

fn print_snapshot(out: &mut impl Write, snap: &Snapshot, config: &Config) -> Result<()> {
    writeln!(out, "--------------------")?;
    writeln!(out, "屏幕: {}", snap.output)?;
    if !snap.buffer.is_empty() {
        writeln!(out, "编码: {}", snap.buffer)?;
    }
    if !snap.auxiliary.is_empty() {
        writeln!(out, "提示: {}", snap.auxiliary)?;
    }
    if !snap.candidates.is_empty() {
        let labels: Vec<char> = config.select_keys.chars().collect();
        let row: Vec<String> = snap
            .candidates
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let label = labels.get(i).copied().unwrap_or('?');
                format!("{}.{}", label, e.text)
            })
            .collect();
        writeln!(out, "候选: {}", row.join("  "))?;
    }
    Ok(())
}
