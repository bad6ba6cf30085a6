use dotenv::dotenv;
use statement_insight::llm::GeminiClient;
use statement_insight::presentation::{render_table, LiquidityDisplay};
use statement_insight::{read_csv_file, AssistantConfig, ChatSession, Role};
use std::error::Error;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sample_statement.csv".to_string());

    let config = AssistantConfig::from_env();
    let client = GeminiClient::from_config(&config)?;
    let language = config.language;
    let mut session = ChatSession::new(config);

    println!("📊 Loading statement from {}...\n", path);
    let table = read_csv_file(&path)?;
    match session.upload(&table) {
        Ok(analysis) => {
            println!("{}", render_table(&analysis.items, language));
        }
        Err(e) => eprintln!("❌ Statement error: {}", e),
    }
    if let Some(snapshot) = session.liquidity() {
        if !snapshot.missing_rows.is_empty() {
            println!(
                "⚠️  Current ratio not available, missing row(s): {}",
                snapshot.missing_rows.join(", ")
            );
        }
        let display = LiquidityDisplay::new(snapshot, language);
        println!("Current ratio (prior):   {}", display.prior);
        println!(
            "Current ratio (current): {} (delta {})",
            display.current,
            display.delta.as_deref().unwrap_or("n/a")
        );
    }

    if session.analysis().is_some() {
        println!("\nRequesting overall analysis...");
        match session.request_overall_analysis(&client) {
            Ok(text) => println!("\n{}\n", text),
            Err(e) => eprintln!("❌ Error: {}", e),
        }
    }

    if let Some(greeting) = session.history().turns().first() {
        if greeting.role == Role::Assistant {
            println!("🤖 {}", greeting.content);
        }
    }
    println!("Ask questions about the statement (type 'quit' to exit).");
    println!("------------------------------------------------------------------");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit") || prompt.eq_ignore_ascii_case("exit") {
            break;
        }

        if prompt.is_empty() {
            continue;
        }

        println!("\nThinking...");

        match session.send(&client, prompt) {
            Ok(response) => {
                println!("\n{}\n", response);
                println!("------------------------------------------------------------------");
            }
            Err(e) => {
                eprintln!("❌ Error: {}", e);
            }
        }
    }

    Ok(())
}
