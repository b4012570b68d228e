use alloy::sol;

sol! {
    /// Provider registry: provider registration and node announcements.
    #[derive(Debug, PartialEq, Eq)]
    contract Registry {
        struct CpuInfo {
            uint256 priceMon;
            uint256 priceSec;
            string model;
        }

        struct GpuInfo {
            uint256 priceMon;
            uint256 priceSec;
            string model;
        }

        struct MemInfo {
            uint256 priceMon;
            uint256 priceSec;
            uint64 num;
        }

        struct DiskInfo {
            uint256 priceMon;
            uint256 priceSec;
            uint64 num;
        }

        event Register(address indexed cp, string name, string ip, string domain, string port);
        event AddNode(address indexed cp, uint64 id, CpuInfo cpu, GpuInfo gpu, MemInfo mem, DiskInfo disk);
    }
}

sol! {
    /// Order market: node rentals and provider withdrawals.
    #[derive(Debug, PartialEq, Eq)]
    contract Market {
        event CreateOrder(address indexed cp, uint64 id, uint256 activeTime, uint256 probation, uint256 duration);
        event Withdraw(address indexed cp, uint256 amount);
    }
}
