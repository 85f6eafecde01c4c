mod documents;
mod health_check;
