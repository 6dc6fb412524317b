fn main() {
    batchgraph::cli::run();
}
