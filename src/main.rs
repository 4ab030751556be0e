fn main() {
    specsuite::cli::run();
}
