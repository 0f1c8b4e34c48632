fn main() {
    fontfetch_cli::main()
}
