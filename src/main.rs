fn main() {
    facility_api::main();
}
