#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finance_master_api::cli::run_with_sys_args().await
}
