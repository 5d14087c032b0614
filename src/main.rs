fn main() -> anyhow::Result<()> {
    pets_api::cli::run_cli()
}
