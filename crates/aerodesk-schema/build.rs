fn main() {
    cynic_codegen::register_schema("airline")
        .from_sdl_file("../../schemas/airline.graphql")
        .expect("Failed to find airline GraphQL Schema")
        .as_default()
        .expect("Failed to set airline schema as default");
}
