//! Minimal charge against the gateway's test environment.
//!
//! Expects merchant credentials in `config/development.toml` or via
//! `SECUREPAY__MERCHANT__*` environment variables.

use securepay_client::{
    logger, CardDetails, CardNumber, Config, Currency, Cvv, ExpiryDate, FloatMajorUnit, OrderId,
    PaymentRequest, SecurepayClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new()?;
    logger::setup(&config.log);

    let client = SecurepayClient::new(&config).map_err(|error| format!("{error:?}"))?;

    let card = CardDetails::new(
        CardNumber::new("4444333322221111"),
        ExpiryDate::parse("08/29")?,
    )
    .with_cvv(Cvv::new("123"));

    let request = PaymentRequest::new(
        FloatMajorUnit::new(4.12),
        Currency::AUD,
        OrderId::new("EXAMPLE-0001")?,
    )
    .with_card(card)
    .with_test_mode(true);

    let outcome = client
        .charge(request)
        .await
        .map_err(|error| format!("{error:?}"))?;
    println!(
        "status: {} ({:?}), txn id: {:?}",
        outcome.status().status,
        outcome.status().message,
        outcome.txn_id
    );

    Ok(())
}
