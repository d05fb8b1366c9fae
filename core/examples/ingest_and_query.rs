use knowledgehub::api::{IngestRequest, QueryRequest};
use knowledgehub::config::Config;
use knowledgehub::service::KnowledgeHub;

// needs OPENAI_API_KEY in the environment
#[tokio::main]
async fn main() -> Result<(), knowledgehub::error::Error> {
    let config = Config::from_env()?;
    let hub = KnowledgeHub::from_config(&config);

    let policies = [
        ("hr-leave", "HR", "Leave Policy", "Employees get 20 days of paid leave per year."),
        ("it-vpn", "IT", "VPN", "Always connect through the VPN on public networks."),
        ("fin-expenses", "Finance", "Expenses", "Expenses above 500 need manager approval."),
    ];
    for (id, department, title, content) in policies {
        let indexed = hub
            .ingest(IngestRequest {
                id: id.to_string(),
                department: department.to_string(),
                title: title.to_string(),
                content: content.to_string(),
            })
            .await?;
        println!("indexed {} ({} dimensions)", indexed.id, indexed.embedding_size);
    }

    let response = hub
        .query(QueryRequest {
            question: "How many leave days do I get?".to_string(),
            department: Some("HR".to_string()),
            top_k: 2,
        })
        .await?;
    _ = dbg!(response);

    println!("{} documents stored", hub.health().await.documents_count);
    Ok(())
}
