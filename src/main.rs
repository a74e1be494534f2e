fn main() -> anyhow::Result<()> {
    table_filter::run()
}
