#![allow(dead_code)]
#![allow(non_upper_case_globals)]

use bitflags::bitflags;
use libc::c_ulong;
use libc::c_uint;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MsFlags: c_ulong {
        /* Mount read-only */
        const MsRdonly = 1;

        /* Ignore suid and sgid bits */
        const MsNosuid = 2;

        /* Disallow access to device special files */
        const MsNodev = 4;

        /* Disallow program execution */
        const MsNoexec = 8;

        /* Writes are synced at once */
        const MsSynchronous = 16;

        /* Alter flags of a mounted FS */
        const MsRemount = 32;

        /* Allow mandatory locks on an FS */
        const MsMandlock = 64;

        const MsBind = 4096;

        const MsRec = 16384;

        const MsSilent = 32768;

        /* VFS does not apply the umask */
        const MsPosixacl = 1<<16;

        /* Update inode I_version field */
        const MsIVersion = 1<<23;

        const MsNouser = 1<<31;

        const MsRmtMask = Self::MsRdonly.bits()|Self::MsSynchronous.bits()|Self::MsMandlock.bits()|Self::MsIVersion.bits();

        const MsMgcVal = 0xC0ED0000;

        const MsMgcMsk = 0xffff0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MntFlags: c_uint {
        /* Attempt to forcibily umount */
        const MntForce = 0x00000001;

        /* Just detach from the tree */
        const MntDetach = 0x00000002;

        /* Mark for expiry */
        const MntExpire = 0x00000004;

        /* Don't follow symlink on umount */
        const UmountNofollow = 0x00000008;

        /* Flag guaranteed to be unused */
        const UmountUnused = 0x80000000;
    }
}
