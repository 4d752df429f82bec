fn main() {
    cynic_codegen::register_schema("airline")
        .from_sdl_file("schemas/airline.graphql")
        .expect("failed to load airline.graphql schema file")
        .as_default()
        .expect("failed to register airline schema as default");
}
