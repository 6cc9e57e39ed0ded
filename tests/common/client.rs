//! Test chat client.
//!
//! Sends raw command lines and asserts on received reply/notification
//! lines.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// A test client speaking the line protocol.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server and consume the welcome banner.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        };

        let banner = client.recv().await?;
        if !banner.starts_with("WELCOME") {
            anyhow::bail!("unexpected banner: {banner}");
        }
        Ok(client)
    }

    /// Send a raw command line.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line from the server.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout. EOF is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end().to_string())
    }

    /// Send a command and return the next line (its reply).
    pub async fn request(&mut self, line: &str) -> anyhow::Result<String> {
        self.send(line).await?;
        self.recv().await
    }

    /// Log in and assert success.
    pub async fn login(&mut self, handle: &str) -> anyhow::Result<()> {
        let reply = self.request(&format!("LOGIN {handle}")).await?;
        if reply != format!("OK LOGIN {handle}") {
            anyhow::bail!("login failed: {reply}");
        }
        Ok(())
    }

    /// True once the server has closed this connection.
    #[allow(dead_code)]
    pub async fn assert_closed(&mut self) -> bool {
        matches!(
            self.recv_timeout(Duration::from_secs(1)).await,
            Err(e) if e.to_string().contains("connection closed")
        )
    }
}
