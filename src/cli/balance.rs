use crate::client::horizon::{HorizonClient, LedgerGateway};
use crate::config::SextantConfig;
use crate::trustline::Asset;

pub async fn handle_balance_command(
    address: String,
    code: Option<String>,
    issuer: Option<String>,
    config: &SextantConfig,
) {
    let gateway = HorizonClient::new(&config.network.horizon_url);
    let account = match gateway.load_account(&address).await {
        Ok(a) => a,
        Err(e) => {
            println!("Error fetching account: {}", e);
            return;
        }
    };

    if let (Some(code), Some(issuer)) = (code, issuer) {
        let asset = Asset::new(&code, &issuer);
        match account.balances.iter().find(|b| b.matches(&asset)) {
            Some(b) => println!(
                "{}: {} (limit {})",
                code,
                b.balance,
                b.limit.as_deref().unwrap_or("none")
            ),
            None => println!(
                "No {} balance: the account has no trustline for this asset.",
                code
            ),
        }
        return;
    }

    println!("Balances for {}:", address);
    for b in &account.balances {
        match (&b.asset_code, &b.asset_issuer) {
            (Some(code), Some(issuer)) => {
                println!("  {}\t{}\t(issuer {})", code, b.balance, issuer)
            }
            _ => println!("  native\t{}", b.balance),
        }
    }
}
