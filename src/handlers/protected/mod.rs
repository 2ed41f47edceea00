// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/stocks
// Middleware: require_auth injects AuthUser into request extensions

pub mod stocks;
