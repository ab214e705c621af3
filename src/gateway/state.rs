use crate::review::ReviewService;

#[derive(Clone, Debug)]
pub struct HandlerState {
    pub service: ReviewService,

    pub stub_embedder: bool,

    /// CORS origins; empty disables the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl HandlerState {
    pub fn new(service: ReviewService, stub_embedder: bool) -> Self {
        Self {
            service,
            stub_embedder,
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}
