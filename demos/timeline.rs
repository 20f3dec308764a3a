use liquipedia_timeline::{enable_debug_logging, ParserOptions, TimelineClient};

#[tokio::main]
async fn main() -> liquipedia_timeline::Result<()> {
    if std::env::args().any(|a| a == "--debug") {
        enable_debug_logging();
    }

    let client = TimelineClient::new();
    let options = ParserOptions::new().with_timezone("Asia/Shanghai");
    let mut parser = client.get_timeline(&options).await?;
    parser.parse()?;

    for event in parser.events() {
        match &event.time_counting_down {
            Some(countdown) => println!("[{countdown}] {} - {}", event.versus(), event.series),
            None => println!("[{}] {} - {}", event.start_at, event.versus(), event.series),
        }
    }
    println!("{}", parser.to_json(&ParserOptions::new())?);
    Ok(())
}
