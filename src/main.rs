use log::info;

use minichain::{Blockchain, Transaction, Wallet};

// Demo driver: wires freshly generated keys to the chain API and prints the
// resulting ledger. Everything interesting lives in the library.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let my_wallet = Wallet::new()?;
    let friend_wallet = Wallet::new()?;

    info!("Created wallet with address: {}", my_wallet.address());
    info!(
        "Wallet private key: {}",
        hex::encode(my_wallet.export_secret_key())
    );

    let chain = Blockchain::new();

    let mut tx1 = Transaction::new(
        my_wallet.address().clone(),
        friend_wallet.address().clone(),
        10.0,
    );
    tx1.sign(&my_wallet)?;
    chain.add_transaction(tx1)?;

    info!("Starting the miner...");
    chain.mine_pending_transactions(my_wallet.address());

    println!(
        "Balance of my wallet: {}",
        chain.get_balance_of_address(my_wallet.address())
    );
    println!(
        "Balance of friend's wallet: {}",
        chain.get_balance_of_address(friend_wallet.address())
    );

    // Display the ledger contents
    println!("{}", serde_json::to_string_pretty(&chain.get_chain())?);
    println!("Is blockchain valid? {}", chain.is_chain_valid());

    Ok(())
}
