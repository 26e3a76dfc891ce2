pub mod imagen_client;

pub use imagen_client::ImagenClient;
